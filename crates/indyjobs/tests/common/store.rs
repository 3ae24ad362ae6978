//! On-disk test database.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;

use tempfile::TempDir;

use indyjobs::db::{industry_job_repo, Database};
use indyjobs::industry::JobOwner;

/// A migrated database file inside its own temp directory.
pub struct TestStore {
    temp_dir: TempDir,
    pub path: PathBuf,
    pub db: Database,
}

impl TestStore {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("data").join("indyjobs.db");
        let db = Database::open(&path).expect("Failed to open test database");
        Self { temp_dir, path, db }
    }

    /// Job ids stored for `owner`.
    pub fn job_ids(&self, owner: JobOwner) -> HashSet<i32> {
        industry_job_repo::list(&self.db, owner)
            .expect("Failed to list jobs")
            .into_iter()
            .map(|j| j.job_id)
            .collect()
    }
}
