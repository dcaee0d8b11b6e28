//! Tests for the SQLite person repository.

use tempfile::NamedTempFile;

use sudoku_challenge::{Gateway, Person, PersonGateway, PersonRepository};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, PersonRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = PersonRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, repo)
}

#[test]
fn test_empty_path_rejected() {
    assert!(PersonRepository::new("  ".to_string()).is_err());
}

#[test]
fn test_migrations_are_idempotent() {
    let (_db, repo) = setup_test_db();
    let applied = repo.run_migrations().expect("Second run failed");
    assert_eq!(applied, 0);
}

#[test]
fn test_insert_assigns_id() {
    let (_db, repo) = setup_test_db();
    let person = repo
        .save(Person::with_name(42, "Ann Lee"))
        .expect("Save failed");

    assert!(person.id().is_some_and(|id| id > 0));
    assert_eq!(*person.external_id(), 42);
    assert_eq!(person.full_name().as_deref(), Some("Ann Lee"));
    assert_eq!(*person.points(), 0);
}

#[test]
fn test_update_keeps_id() {
    let (_db, repo) = setup_test_db();
    let mut person = repo.save(Person::new(7)).expect("Save failed");
    let id = person.id();

    person.set_points(300);
    person.set_full_name(Some("Bo Kim".to_string()));
    let updated = repo.save(person).expect("Update failed");

    assert_eq!(updated.id(), id);
    assert_eq!(*updated.points(), 300);

    let reloaded = repo
        .find_by_id(id.expect("Missing id"))
        .expect("Query failed")
        .expect("Row missing");
    assert_eq!(reloaded.full_name().as_deref(), Some("Bo Kim"));
    assert_eq!(*reloaded.points(), 300);
}

#[test]
fn test_update_can_clear_name() {
    let (_db, repo) = setup_test_db();
    let mut person = repo
        .save(Person::with_name(8, "Temp Name"))
        .expect("Save failed");

    person.set_full_name(None);
    let updated = repo.save(person).expect("Update failed");
    assert!(updated.full_name().is_none());
}

#[test]
fn test_find_by_id_not_found() {
    let (_db, repo) = setup_test_db();
    let found = repo.find_by_id(12345).expect("Query failed");
    assert!(found.is_none());
}

#[test]
fn test_delete_returns_snapshot() {
    let (_db, repo) = setup_test_db();
    let saved = repo
        .save(Person::with_name(5, "Gone Soon"))
        .expect("Save failed");
    let id = saved.id().expect("Missing id");

    let removed = repo.delete(id).expect("Delete failed");
    assert_eq!(removed.id(), Some(id));
    assert_eq!(removed.full_name().as_deref(), Some("Gone Soon"));
    assert!(repo.find_by_id(id).expect("Query failed").is_none());
}

#[test]
fn test_delete_missing_id_fails() {
    let (_db, repo) = setup_test_db();
    assert!(repo.delete(999).is_err());
}

#[test]
fn test_ids_not_reused_after_delete() {
    let (_db, repo) = setup_test_db();
    let first = repo.save(Person::new(1)).expect("Save failed");
    repo.delete(first.id().expect("Missing id"))
        .expect("Delete failed");
    let second = repo.save(Person::new(2)).expect("Save failed");

    assert!(second.id() > first.id());
}

#[test]
fn test_get_all_in_insertion_order() {
    let (_db, repo) = setup_test_db();
    for external_id in [30, 10, 20] {
        repo.save(Person::new(external_id)).expect("Save failed");
    }

    let all = repo.get_all().expect("List failed");
    let ids: Vec<i64> = all.iter().map(|p| *p.external_id()).collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

#[test]
fn test_get_page() {
    let (_db, repo) = setup_test_db();
    for external_id in 1..=23 {
        repo.save(Person::new(external_id)).expect("Save failed");
    }

    let first = repo.get_page(0).expect("Page failed");
    let second = repo.get_page(1).expect("Page failed");
    let last = repo.get_page(2).expect("Page failed");
    let empty = repo.get_page(3).expect("Page failed");

    assert_eq!(first.len(), 10);
    assert_eq!(*first[0].external_id(), 1);
    assert_eq!(*second[0].external_id(), 11);
    assert_eq!(last.len(), 3);
    assert_eq!(*last[2].external_id(), 23);
    assert!(empty.is_empty());
}

#[test]
fn test_find_by_external_id() {
    let (_db, repo) = setup_test_db();
    repo.save(Person::with_name(77, "Cy Dee")).expect("Save failed");

    let found = repo.find_by_external_id(77).expect("Query failed");
    assert_eq!(found.map(|p| *p.external_id()), Some(77));
    assert!(repo.find_by_external_id(78).expect("Query failed").is_none());
}

#[test]
fn test_duplicate_external_id_rejected() {
    let (_db, repo) = setup_test_db();
    repo.save(Person::new(42)).expect("First save failed");
    let result = repo.save(Person::new(42));
    assert!(result.is_err(), "Duplicate external id should fail");
}
