use chrono::NaiveDate;
use rentree_config::SchoolYearConfig;
use rentree_models::{GradeLevel, Placement, age_at, assign_grade, is_preinscrit};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_age_table_at_the_rentree() {
    let rentree = date(2024, 9, 1);
    let expected = [
        (3, GradeLevel::PetiteSection),
        (4, GradeLevel::MoyenneSection),
        (5, GradeLevel::GrandeSection),
        (6, GradeLevel::Cp),
        (7, GradeLevel::Ce1),
        (8, GradeLevel::Ce2),
        (9, GradeLevel::Cm1),
        (10, GradeLevel::Cm2),
    ];

    for (age, level) in expected {
        let birth = date(2024 - age, 5, 20);
        assert_eq!(assign_grade(birth, rentree), Placement::Grade(level), "age {age}");
    }
}

#[test]
fn test_too_young_is_not_placed() {
    let rentree = date(2024, 9, 1);
    for birth in [date(2022, 1, 1), date(2024, 8, 31), date(2025, 1, 1)] {
        assert_eq!(assign_grade(birth, rentree), Placement::NotEligible);
        assert!(is_preinscrit(birth, rentree));
    }
}

#[test]
fn test_too_old_is_not_placed() {
    let rentree = date(2024, 9, 1);
    assert_eq!(assign_grade(date(2013, 9, 1), rentree), Placement::NotEligible);
    assert_eq!(
        assign_grade(date(2013, 9, 2), rentree),
        Placement::Grade(GradeLevel::Cm2)
    );
}

#[test]
fn test_birthday_on_the_rentree_counts() {
    let rentree = date(2024, 9, 1);

    assert_eq!(age_at(date(2018, 9, 1), rentree), 6);
    assert_eq!(
        assign_grade(date(2018, 9, 1), rentree),
        Placement::Grade(GradeLevel::Cp)
    );
    // one day later, still five
    assert_eq!(
        assign_grade(date(2018, 9, 2), rentree),
        Placement::Grade(GradeLevel::GrandeSection)
    );
}

#[test]
fn test_configured_rentree_changes_the_boundary() {
    let config = SchoolYearConfig::parse("08-25").unwrap();
    let rentree = config.rentree_for(2024);
    assert_eq!(rentree, date(2024, 8, 25));

    let birth = date(2018, 8, 30);
    assert_eq!(
        assign_grade(birth, rentree),
        Placement::Grade(GradeLevel::GrandeSection)
    );
    assert_eq!(
        assign_grade(birth, SchoolYearConfig::default().rentree_for(2024)),
        Placement::Grade(GradeLevel::Cp)
    );
}

#[test]
fn test_next_level_chain_ends_at_cm2() {
    let mut level = GradeLevel::PetiteSection;
    let mut steps = 0;
    while let Some(next) = level.next() {
        assert!(next > level);
        level = next;
        steps += 1;
    }
    assert_eq!(level, GradeLevel::Cm2);
    assert_eq!(steps, 7);
}
