//! Sample database used to exercise schema checks locally

use std::path::{Path, PathBuf};

use sqlx::Acquire;
use vigil_errors::{Error, StateError};

use crate::{count_rows, create_pool};

/// Table created by the seeder
pub const SAMPLE_TABLE: &str = "users";

const SAMPLE_USERS: [(&str, &str); 2] = [
    ("Alice", "alice@example.com"),
    ("Bob", "bob@example.com"),
];

/// Outcome of a seeding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub path: PathBuf,
    /// Rows in the sample table after the commit
    pub rows: i64,
}

/// Drop and recreate `users(id, name, email)` with two fixed rows.
///
/// Everything runs in one transaction, so a failed seed leaves the previous
/// contents untouched.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or any statement fails.
pub async fn seed_sample_database(db_path: &Path) -> Result<SeedReport, Error> {
    let pool = create_pool(db_path).await?;
    let mut conn = pool.acquire().await?;
    let mut tx = conn.begin().await?;

    sqlx::query("DROP TABLE IF EXISTS users")
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        r#"
        CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT,
            email TEXT
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    for (name, email) in SAMPLE_USERS {
        sqlx::query("INSERT INTO users (name, email) VALUES (?1, ?2)")
            .bind(name)
            .bind(email)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await.map_err(|e| StateError::TransactionFailed {
        message: e.to_string(),
    })?;
    drop(conn);

    let rows = count_rows(&pool, SAMPLE_TABLE).await;
    pool.close().await;
    let rows = rows?;

    tracing::info!(path = %db_path.display(), rows, "Seeded sample database");
    Ok(SeedReport {
        path: db_path.to_path_buf(),
        rows,
    })
}
