//! Student seeding.

use std::time::Instant;

use chrono::{Days, NaiveDate};
use fake::Fake;
use fake::faker::name::fr_fr::{FirstName, LastName};
use rand::Rng;
use rayon::prelude::*;
use rentree_models::{ImportOutcome, StudentIdentity};
use rentree_roster::{RosterStore, enroll};

use super::models::SeedConfig;

/// Generates `config.students` children whose age at the rentrée falls in
/// `min_age..=max_age`.
pub fn generate_students(config: &SeedConfig) -> Vec<StudentIdentity> {
    let (youngest, oldest) = birth_range(config);
    let span = (youngest - oldest).num_days().max(0) as u64;

    (0..config.students)
        .into_par_iter()
        .map(|_| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let offset = rand::thread_rng().gen_range(0..=span);
            let birth_date = oldest.checked_add_days(Days::new(offset)).unwrap_or(oldest);

            StudentIdentity::new(&last_name, &first_name, birth_date)
        })
        .collect()
}

/// Latest and earliest birth dates for the configured ages.
fn birth_range(config: &SeedConfig) -> (NaiveDate, NaiveDate) {
    let year_back = |years: i32| {
        config
            .rentree
            .checked_sub_months(chrono::Months::new(12 * years.max(0) as u32))
            .unwrap_or(config.rentree)
    };
    // a child is `min_age` on the rentrée itself when born exactly min_age years before
    let youngest = year_back(config.min_age);
    let oldest = year_back(config.max_age + 1)
        .checked_add_days(Days::new(1))
        .unwrap_or(youngest);
    (youngest, oldest)
}

/// Generates students and imports them into `store`.
pub async fn seed_students<S>(store: &mut S, config: &SeedConfig) -> ImportOutcome
where
    S: RosterStore + ?Sized,
{
    let start_time = Instant::now();
    println!(
        "🎓 Seeding {} students aged {} to {} at the rentrée {}...",
        config.students, config.min_age, config.max_age, config.rentree
    );

    let records = generate_students(config);
    println!("   ✓ Generated {} identities in {:?}", records.len(), start_time.elapsed());

    let outcome = enroll(store, &records, config.rentree).await;
    println!(
        "   ✓ Created {}, enrolled {}, not eligible {}, duplicates {}, failed {} in {:?}",
        outcome.created.len(),
        outcome.enrolled.len(),
        outcome.not_eligible.len(),
        outcome.duplicates.len(),
        outcome.failed.len(),
        start_time.elapsed()
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentree_models::{Placement, age_at, assign_grade};
    use rentree_roster::MemoryRosterStore;

    fn rentree() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    #[test]
    fn test_generated_ages_stay_in_range() {
        let config = SeedConfig::new(300, rentree()).with_ages(3, 6);
        let students = generate_students(&config);

        assert_eq!(students.len(), 300);
        for student in &students {
            let age = age_at(student.birth_date, rentree());
            assert!((3..=6).contains(&age), "{student} is {age}");
        }
    }

    #[tokio::test]
    async fn test_seeded_students_are_placed() {
        let config = SeedConfig::new(50, rentree()).with_ages(3, 10);
        let mut store = MemoryRosterStore::new();

        let outcome = seed_students(&mut store, &config).await;

        assert!(outcome.failed.is_empty());
        assert!(outcome.not_eligible.is_empty());
        assert_eq!(outcome.enrolled.len(), outcome.created.len());
        let students = store.list_students().await.unwrap();
        for student in students {
            assert!(matches!(
                assign_grade(student.birth_date, rentree()),
                Placement::Grade(_)
            ));
        }
    }
}
