// crates/import-harness/tests/helpers/seed.rs
// ============================================================================
// Module: Seeded Databases
// Description: Temporary SQLite databases shaped like the import target.
// Dependencies: rusqlite, tempfile
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use import_harness::db::DatabaseConfig;
use rusqlite::Connection;
use rusqlite::params;
use tempfile::TempDir;

/// Schema of the import target table.
const SCHEMA: &str = r#"
CREATE TABLE imported_persons (
    "personId" INTEGER PRIMARY KEY,
    "fullName" TEXT,
    "score" REAL,
    "active" INTEGER NOT NULL DEFAULT 1
);
"#;

/// Temporary database that is deleted on drop.
pub struct SeededDb {
    dir: TempDir,
    path: PathBuf,
}

impl SeededDb {
    /// Creates an empty database with the import target schema.
    pub fn empty() -> Result<Self, Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("imports.db");
        let connection = Connection::open(&path)?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            dir,
            path,
        })
    }

    /// Creates a database holding the given person rows.
    pub fn with_persons(persons: &[(i64, &str)]) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Self::empty()?;
        let connection = Connection::open(&db.path)?;
        for (person_id, name) in persons {
            connection.execute(
                r#"INSERT INTO imported_persons ("personId", "fullName", "score") VALUES (?1, ?2, ?3)"#,
                params![person_id, name, 0.5],
            )?;
        }
        Ok(db)
    }

    /// Returns the database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the temporary directory holding the database.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Returns harness settings pointing at this database.
    pub fn config(&self) -> DatabaseConfig {
        DatabaseConfig::Sqlite {
            path: self.path.clone(),
        }
    }
}

/// Path of a fixture under `tests/data/`.
pub fn test_data(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(relative)
}
