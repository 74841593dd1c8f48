use std::collections::HashSet;

use chrono::NaiveDate;
use rentree_models::{GradeLevel, StudentId, StudentIdentity};
use rentree_roster::{MemoryRosterStore, RosterStore, enroll, parse_csv, promote};

fn rentree() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
}

fn identity(last: &str, first: &str, y: i32, m: u32, d: u32) -> StudentIdentity {
    StudentIdentity::new(last, first, NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

async fn id_of(store: &mut MemoryRosterStore, identity: &StudentIdentity) -> StudentId {
    store.find_student(identity).await.unwrap().unwrap().id
}

/// CP holds Alice (repeating) and Bruno; CM2 holds Chloé.
async fn school() -> (MemoryRosterStore, [StudentIdentity; 3]) {
    let alice = identity("Durand", "Alice", 2018, 3, 1);
    let bruno = identity("Morel", "Bruno", 2018, 6, 12);
    let chloe = identity("Petit", "Chloé", 2014, 2, 1);

    let mut store = MemoryRosterStore::new();
    let outcome = enroll(&mut store, &[alice.clone(), bruno.clone(), chloe.clone()], rentree()).await;
    assert_eq!(outcome.enrolled.len(), 3);

    (store, [alice, bruno, chloe])
}

#[tokio::test]
async fn test_year_end_promotion() {
    let (mut store, [alice, bruno, chloe]) = school().await;
    let (a, b, c) = (
        id_of(&mut store, &alice).await,
        id_of(&mut store, &bruno).await,
        id_of(&mut store, &chloe).await,
    );

    let repeating = HashSet::from([alice.clone()]);
    let outcome = promote(&mut store, &repeating).await.unwrap();

    assert_eq!(store.members(GradeLevel::Cp).into_iter().collect::<Vec<_>>(), vec![a]);
    assert_eq!(store.members(GradeLevel::Ce1).into_iter().collect::<Vec<_>>(), vec![b]);
    assert!(store.members(GradeLevel::Cm2).is_empty());
    assert!(store.grades_of(c).is_empty());

    assert_eq!(outcome.retained, vec![a]);
    assert_eq!(outcome.promoted, vec![b]);
    assert_eq!(outcome.graduated, vec![c]);
    assert!(outcome.is_clean());
    assert!(outcome.unknown_repeating.is_empty());
}

#[tokio::test]
async fn test_running_twice_moves_students_again() {
    let (mut store, [alice, bruno, _]) = school().await;
    let (a, b) = (
        id_of(&mut store, &alice).await,
        id_of(&mut store, &bruno).await,
    );

    promote(&mut store, &HashSet::from([alice])).await.unwrap();
    let second = promote(&mut store, &HashSet::new()).await.unwrap();

    // nothing in the roster layer remembers the first run
    assert_eq!(store.grades_of(a), vec![GradeLevel::Ce1]);
    assert_eq!(store.grades_of(b), vec![GradeLevel::Ce2]);
    assert_eq!(second.promoted.len(), 2);
    assert!(second.graduated.is_empty());
}

#[tokio::test]
async fn test_repeating_list_from_csv_matches_despite_spacing() {
    let (mut store, [alice, ..]) = school().await;
    let a = id_of(&mut store, &alice).await;

    let parsed = parse_csv("Nom;Prenom;Date de naissance\n  Durand ; Alice ;01/03/2018\nInconnu;Zoé;02/02/2017\n")
        .unwrap();
    let repeating: HashSet<StudentIdentity> =
        parsed.records.iter().map(StudentIdentity::normalized).collect();

    let outcome = promote(&mut store, &repeating).await.unwrap();

    assert_eq!(outcome.retained, vec![a]);
    assert_eq!(
        outcome.unknown_repeating,
        vec![identity("Inconnu", "Zoé", 2017, 2, 2)]
    );
}

#[tokio::test]
async fn test_reimporting_the_same_list_changes_nothing() {
    let (mut store, students) = school().await;

    let outcome = enroll(&mut store, &students, rentree()).await;

    assert!(outcome.created.is_empty());
    assert_eq!(outcome.duplicates.len(), 3);
    assert_eq!(store.list_students().await.unwrap().len(), 3);
}
