//! Reading student lists from uploaded files.
//!
//! Two formats are accepted:
//!
//! - CSV with a header row naming `Nom`, `Prenom` and `Date de naissance`
//!   in any order, separated by commas or semicolons, with dates written
//!   `dd/mm/yyyy` or `yyyy-mm-dd`;
//! - plain text with one child per line, `Nom Prenom 12 mars 2022`.
//!
//! Lines that cannot be read are returned with their 1-based line number;
//! the other lines are still returned.

use chrono::{Datelike, NaiveDate};
use rentree_models::{LineError, StudentIdentity};
use thiserror::Error;

const BIRTH_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y"];

const FRENCH_MONTHS: &[(&str, u32)] = &[
    ("janvier", 1),
    ("fevrier", 2),
    ("mars", 3),
    ("avril", 4),
    ("mai", 5),
    ("juin", 6),
    ("juillet", 7),
    ("aout", 8),
    ("septembre", 9),
    ("octobre", 10),
    ("novembre", 11),
    ("decembre", 12),
];

/// Errors that reject a whole file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("file is empty")]
    Empty,
    #[error("missing column: {0}")]
    MissingColumn(&'static str),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedRecords {
    pub records: Vec<StudentIdentity>,
    pub rejected: Vec<LineError>,
}

impl ParsedRecords {
    fn reject(&mut self, line: usize, reason: impl Into<String>) {
        self.rejected.push(LineError {
            line,
            reason: reason.into(),
        });
    }
}

/// Parses a CSV student list.
pub fn parse_csv(input: &str) -> Result<ParsedRecords, ParseError> {
    let mut lines = input
        .trim_start_matches('\u{feff}')
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or(ParseError::Empty)?;
    let delimiter = if header.contains(';') && !header.contains(',') {
        ';'
    } else {
        ','
    };

    let columns: Vec<String> = split_record(header, delimiter)
        .iter()
        .map(|c| fold_header(c))
        .collect();
    let position = |name: &'static str, label: &'static str| {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or(ParseError::MissingColumn(label))
    };
    let last_name_col = position("nom", "Nom")?;
    let first_name_col = position("prenom", "Prenom")?;
    let birth_date_col = position("datedenaissance", "Date de naissance")?;
    let needed = last_name_col.max(first_name_col).max(birth_date_col) + 1;

    let mut parsed = ParsedRecords::default();
    for (line_no, line) in lines {
        let fields = split_record(line, delimiter);
        if fields.len() < needed {
            parsed.reject(
                line_no,
                format!("expected {needed} fields, found {}", fields.len()),
            );
            continue;
        }

        let last_name = fields[last_name_col].trim();
        let first_name = fields[first_name_col].trim();
        if last_name.is_empty() || first_name.is_empty() {
            parsed.reject(line_no, "last name and first name are required");
            continue;
        }

        let raw_date = fields[birth_date_col].trim();
        match parse_birth_date(raw_date) {
            Some(birth_date) => parsed
                .records
                .push(StudentIdentity::new(last_name, first_name, birth_date)),
            None => parsed.reject(line_no, format!("invalid birth date '{raw_date}'")),
        }
    }

    Ok(parsed)
}

/// Parses a pre-registration text file: `Nom Prenom dd mois yyyy` per line.
///
/// Everything between the first word and the date is the first name.
pub fn parse_preinscrits(input: &str) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();

    for (idx, line) in input.trim_start_matches('\u{feff}').lines().enumerate() {
        let line_no = idx + 1;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        if words.len() < 5 {
            parsed.reject(line_no, "expected 'Nom Prenom jour mois année'");
            continue;
        }

        let (names, date) = words.split_at(words.len() - 3);
        match parse_french_date(date[0], date[1], date[2]) {
            Some(birth_date) => parsed.records.push(StudentIdentity::new(
                names[0],
                &names[1..].join(" "),
                birth_date,
            )),
            None => parsed.reject(line_no, format!("invalid birth date '{}'", date.join(" "))),
        }
    }

    parsed
}

/// Numeric birth date in one of the accepted layouts.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .filter(|date| date.year() >= 1900)
}

/// Date written with a French month name, e.g. `12 mars 2022`.
pub fn parse_french_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    let month = fold_accents(month.trim_end_matches('.'));
    let (_, month) = FRENCH_MONTHS.iter().find(|(name, _)| *name == month)?;

    NaiveDate::from_ymd_opt(year, *month, day).filter(|date| date.year() >= 1900)
}

/// Splits one CSV line on `delimiter`, honouring double quotes.
fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                buf.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => out.push(std::mem::take(&mut buf)),
            c => buf.push(c),
        }
    }
    out.push(buf);
    out
}

fn fold_accents(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            c => c,
        })
        .collect()
}

/// `Date de naissance` -> `datedenaissance`
fn fold_header(s: &str) -> String {
    fold_accents(s.trim())
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}
