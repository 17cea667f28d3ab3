#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! `SQLite` access for vigil
//!
//! Schema checks only need one capability from the database: list the
//! columns of a table. This crate opens the configured database read-only,
//! answers that question, and also owns the sample-database seeder used to
//! exercise the schema check locally.

pub mod seed;

pub use seed::{seed_sample_database, SeedReport, SAMPLE_TABLE};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;
use vigil_errors::{Error, StateError};

/// Open an existing database for metadata inspection.
///
/// The file is never created: a missing, unreadable, or corrupt database is
/// reported as `StateError::ConnectionFailed`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or is not a valid
/// `SQLite` file.
pub async fn open_read_only(db_path: &Path) -> Result<Pool<Sqlite>, Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(false)
        .read_only(true)
        .busy_timeout(Duration::from_secs(5));

    let connection_failed = |e: sqlx::Error| {
        Error::from(StateError::ConnectionFailed {
            path: db_path.display().to_string(),
            message: e.to_string(),
        })
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(connection_failed)?;

    // Reading the schema table forces SQLite to validate the file header.
    if let Err(e) = sqlx::query("SELECT count(*) FROM sqlite_master")
        .fetch_one(&pool)
        .await
    {
        pool.close().await;
        return Err(connection_failed(e));
    }

    tracing::debug!(path = %db_path.display(), "Opened database read-only");
    Ok(pool)
}

/// Create a new `SQLite` connection pool, creating the file when missing.
///
/// # Errors
///
/// Returns an error if the database connection fails or configuration is invalid.
pub async fn create_pool(db_path: &Path) -> Result<Pool<Sqlite>, Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| {
            Error::from(StateError::ConnectionFailed {
                path: db_path.display().to_string(),
                message: e.to_string(),
            })
        })
}

/// Column names of `table`, in declaration order.
///
/// # Errors
///
/// Returns `StateError::TableNotFound` when the table does not exist and
/// `StateError::DatabaseError` when the introspection query fails.
pub async fn table_columns(pool: &Pool<Sqlite>, table: &str) -> Result<Vec<String>, Error> {
    let columns: Vec<String> =
        sqlx::query_scalar("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .bind(table)
            .fetch_all(pool)
            .await?;

    if columns.is_empty() {
        return Err(StateError::TableNotFound {
            table: table.to_string(),
        }
        .into());
    }

    tracing::trace!(table, columns = ?columns, "Introspected table");
    Ok(columns)
}

/// Number of rows in `table`.
///
/// # Errors
///
/// Returns an error if the table does not exist or the query fails.
pub async fn count_rows(pool: &Pool<Sqlite>, table: &str) -> Result<i64, Error> {
    // Identifiers cannot be bound; quote them instead.
    let sql = format!("SELECT count(*) FROM \"{}\"", table.replace('"', "\"\""));
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(count)
}
