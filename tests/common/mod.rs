//! Helpers for integration tests.
#![allow(dead_code)]

use pushkind_directory::db::{DbPool, establish_connection_pool, run_migrations};
use pushkind_directory::repository::DieselRepository;
use pushkind_directory::sample::{SampleDirectory, seed_store};
use tempfile::NamedTempFile;

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        run_migrations(&pool).expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    /// A migrated database holding the sample directory.
    pub fn seeded() -> Self {
        let test_db = Self::new();
        let sample = SampleDirectory::load().expect("sample data should build");
        seed_store(&test_db.repo(), &sample).expect("seeding should succeed");
        test_db
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}
