use pushkind_directory::db::run_migrations;
use pushkind_directory::repository::{
    BusinessReader, CategoryReader, CategoryWriter, UserReader, UserWriter,
};
use pushkind_directory::sample::{SampleDirectory, seed_store};

mod common;

#[test]
fn migrated_database_starts_empty() {
    let test_db = common::TestDb::new();
    assert!(test_db.pool().get().is_ok());
    assert_eq!(test_db.repo().count_businesses().unwrap(), 0);
}

#[test]
fn migrations_are_idempotent() {
    let test_db = common::TestDb::new();
    assert!(run_migrations(&test_db.pool()).is_ok());
}

#[test]
fn seeding_only_fills_an_empty_store() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let sample = SampleDirectory::load().unwrap();

    assert!(seed_store(&repo, &sample).unwrap());
    assert_eq!(repo.count_businesses().unwrap(), 8);

    assert!(!seed_store(&repo, &sample).unwrap());
    assert_eq!(repo.count_businesses().unwrap(), 8);
}

#[test]
fn seeding_resumes_after_an_interrupted_seed() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let sample = SampleDirectory::load().unwrap();

    for user in &sample.users {
        repo.create_user(user).unwrap();
    }
    let first_category = sample.categories[0].clone();
    repo.create_category(&first_category.into()).unwrap();

    assert!(seed_store(&repo, &sample).unwrap());
    assert_eq!(repo.count_businesses().unwrap(), 8);
    assert_eq!(repo.list_categories(true).unwrap().len(), 6);
    assert!(repo.get_user_by_id(&sample.users[0].id).unwrap().is_some());
}
