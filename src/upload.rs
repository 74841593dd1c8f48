//! Reading `multipart/form-data` uploads.

use std::collections::HashMap;

use anyhow::anyhow;
use axum::extract::Multipart;

use rentree_core::AppError;

/// Largest file accepted by the import endpoints.
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// A text file together with the plain form fields sent alongside it.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<String>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// Reads every part, keeping `file_field` as the file and the others as
    /// text fields.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(anyhow!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(anyhow!("Could not read field {}: {}", name, e)))?;

            if name == file_field {
                if bytes.len() > MAX_UPLOAD_BYTES {
                    return Err(AppError::bad_request(anyhow!(
                        "File is larger than {} bytes",
                        MAX_UPLOAD_BYTES
                    )));
                }
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|_| AppError::bad_request(anyhow!("File must be UTF-8 text")))?;
                form.file = Some(text);
            } else {
                let value = String::from_utf8_lossy(&bytes).trim().to_string();
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// The uploaded file, or a 400 naming the expected field.
    pub fn require_file(&mut self, file_field: &str) -> Result<String, AppError> {
        self.file
            .take()
            .ok_or_else(|| AppError::bad_request(anyhow!("No file received in field '{}'", file_field)))
    }

    /// Parses an optional text field.
    pub fn parse_field<T>(&self, name: &str) -> Result<Option<T>, AppError>
    where
        T: std::str::FromStr,
    {
        match self.fields.get(name).map(String::as_str) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| AppError::bad_request(anyhow!("Invalid value for {}: {}", name, raw))),
        }
    }
}
