//! Grade levels and the class assignment rule.
//!
//! A child is placed by their age in completed years at the rentrée. Ages 3
//! to 10 map onto the eight levels from Petite Section to CM2; every other
//! age, including negative ages for birth dates after the rentrée, is
//! [`Placement::NotEligible`].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Age in completed years at which a child enters Petite Section.
pub const MIN_SCHOOL_AGE: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum GradeLevel {
    #[serde(rename = "Petite Section")]
    PetiteSection,
    #[serde(rename = "Moyenne Section")]
    MoyenneSection,
    #[serde(rename = "Grande Section")]
    GrandeSection,
    #[serde(rename = "CP")]
    Cp,
    #[serde(rename = "CE1")]
    Ce1,
    #[serde(rename = "CE2")]
    Ce2,
    #[serde(rename = "CM1")]
    Cm1,
    #[serde(rename = "CM2")]
    Cm2,
}

impl GradeLevel {
    /// Every level, youngest first.
    pub const ALL: [GradeLevel; 8] = [
        GradeLevel::PetiteSection,
        GradeLevel::MoyenneSection,
        GradeLevel::GrandeSection,
        GradeLevel::Cp,
        GradeLevel::Ce1,
        GradeLevel::Ce2,
        GradeLevel::Cm1,
        GradeLevel::Cm2,
    ];

    /// Display label, also used as the stored value.
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeLevel::PetiteSection => "Petite Section",
            GradeLevel::MoyenneSection => "Moyenne Section",
            GradeLevel::GrandeSection => "Grande Section",
            GradeLevel::Cp => "CP",
            GradeLevel::Ce1 => "CE1",
            GradeLevel::Ce2 => "CE2",
            GradeLevel::Cm1 => "CM1",
            GradeLevel::Cm2 => "CM2",
        }
    }

    /// The level a non-repeating student moves to at year end.
    /// `None` for CM2, whose students leave the school.
    pub fn next(&self) -> Option<GradeLevel> {
        let idx = GradeLevel::ALL.iter().position(|g| g == self)?;
        GradeLevel::ALL.get(idx + 1).copied()
    }

    /// Level for an age in completed years.
    pub fn for_age(age: i32) -> Option<GradeLevel> {
        let idx = usize::try_from(age - MIN_SCHOOL_AGE).ok()?;
        GradeLevel::ALL.get(idx).copied()
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGradeLevel(pub String);

impl fmt::Display for UnknownGradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown grade level: {}", self.0)
    }
}

impl std::error::Error for UnknownGradeLevel {}

impl FromStr for GradeLevel {
    type Err = UnknownGradeLevel;

    /// Accepts the display label as well as slugs such as `petite-section`
    /// and the usual abbreviations `PS`, `MS`, `GS`. Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | '_' => ' ',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "petite section" | "ps" => Ok(GradeLevel::PetiteSection),
            "moyenne section" | "ms" => Ok(GradeLevel::MoyenneSection),
            "grande section" | "gs" => Ok(GradeLevel::GrandeSection),
            "cp" => Ok(GradeLevel::Cp),
            "ce1" => Ok(GradeLevel::Ce1),
            "ce2" => Ok(GradeLevel::Ce2),
            "cm1" => Ok(GradeLevel::Cm1),
            "cm2" => Ok(GradeLevel::Cm2),
            _ => Err(UnknownGradeLevel(s.to_string())),
        }
    }
}

impl Type<sqlx::Postgres> for GradeLevel {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for GradeLevel {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for GradeLevel {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

impl PgHasArrayType for GradeLevel {
    fn array_type_info() -> PgTypeInfo {
        <String as PgHasArrayType>::array_type_info()
    }
}

/// Result of the class assignment rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "placement", content = "grade_level", rename_all = "snake_case")]
pub enum Placement {
    Grade(GradeLevel),
    NotEligible,
}

impl Placement {
    pub fn grade(&self) -> Option<GradeLevel> {
        match self {
            Placement::Grade(level) => Some(*level),
            Placement::NotEligible => None,
        }
    }
}

/// Age in completed years on `reference`.
///
/// A birthday falling on `reference` counts as completed. A 29 February
/// birthday completes on 1 March in non-leap years.
pub fn age_at(birth_date: NaiveDate, reference: NaiveDate) -> i32 {
    let years = reference.year() - birth_date.year();
    if (reference.month(), reference.day()) < (birth_date.month(), birth_date.day()) {
        years - 1
    } else {
        years
    }
}

/// Grade level for a child born on `birth_date`, for the school year starting
/// on `rentree`.
pub fn assign_grade(birth_date: NaiveDate, rentree: NaiveDate) -> Placement {
    match GradeLevel::for_age(age_at(birth_date, rentree)) {
        Some(level) => Placement::Grade(level),
        None => Placement::NotEligible,
    }
}

/// True when the child is still too young for Petite Section at `rentree`.
pub fn is_preinscrit(birth_date: NaiveDate, rentree: NaiveDate) -> bool {
    age_at(birth_date, rentree) < MIN_SCHOOL_AGE
}
