use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use rentree_core::AppError;

/// Flattens validation errors, including those of nested lists such as
/// `students[2].last_name`.
fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_errors(errors, "", &mut messages);
    messages.join(", ")
}

fn collect_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{path} is invalid"))
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect_errors(inner, &format!("{path}[{idx}]"), out);
                }
            }
        }
    }
}

/// Runs the `validator` rules of a payload that did not arrive as JSON,
/// answering 422 like [`ValidatedJson`].
pub fn validate_payload<T: Validate>(value: &T) -> Result<(), AppError> {
    value.validate().map_err(|errors| {
        AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            anyhow!("{}", format_errors(&errors)),
        )
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("{} is required", field),
                    );
                }

                if error_msg.contains("invalid type") || error_msg.contains("premature end of input") {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("Invalid field type in request"),
                    );
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("Missing 'Content-Type: application/json' header"),
                    );
                }

                AppError::new(StatusCode::BAD_REQUEST, anyhow!("Invalid request body"))
            })?;

        validate_payload(&value)?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rentree_models::{ImportStudentsDto, PromotionRequest, StudentIdentity};

    #[test]
    fn test_format_nested_errors_names_the_item() {
        let dto = ImportStudentsDto {
            students: vec![
                StudentIdentity::new("Martin", "Léa", NaiveDate::from_ymd_opt(2019, 4, 12).unwrap()),
                StudentIdentity::new("", "Hugo", NaiveDate::from_ymd_opt(2018, 1, 20).unwrap()),
            ],
            rentree: None,
        };

        let errors = dto.validate().unwrap_err();
        assert_eq!(format_errors(&errors), "students[1].last_name is invalid");
    }

    #[test]
    fn test_validate_payload_rejects_out_of_range_year() {
        let typo = PromotionRequest {
            school_year: 20255,
            repeating: vec![],
        };
        let err = validate_payload(&typo).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let fine = PromotionRequest {
            school_year: 2025,
            repeating: vec![],
        };
        assert!(validate_payload(&fine).is_ok());
    }
}
