//! Database schema checks

use vigil_config::DatabaseSpec;
use vigil_errors::{ConfigError, Error, StateError};
use vigil_events::AuditSink;

use crate::{CheckResults, CheckStatus, Failure};

/// Key of the single result recorded when the database cannot be opened
pub const DATABASE_KEY: &str = "database";

/// Check that every configured table has at least its required columns.
///
/// A missing `path` or a connection failure yields exactly one `database`
/// entry and no per-table entries. A failure on one table never stops the remaining tables.
pub async fn check_database(spec: &DatabaseSpec, log: &dyn AuditSink) -> CheckResults {
    let mut results = CheckResults::new();

    let opened = match spec.path.as_deref() {
        Some(path) => vigil_state::open_read_only(path)
            .await
            .map_err(state_failure),
        None => Err(Failure::Config(ConfigError::Invalid {
            message: "database path is not set".to_string(),
        })),
    };

    let pool = match opened {
        Ok(pool) => pool,
        Err(failure) => {
            log.error(&format!("Database connection failed: {failure}"));
            results.insert(DATABASE_KEY, CheckStatus::Fail(failure));
            return results;
        }
    };

    for table in &spec.tables {
        let status = match vigil_state::table_columns(&pool, &table.name).await {
            Ok(actual) => {
                let missing: Vec<String> = table
                    .columns
                    .iter()
                    .filter(|required| !actual.contains(*required))
                    .cloned()
                    .collect();
                if missing.is_empty() {
                    log.info(&format!("Database check passed for table {}", table.name));
                    CheckStatus::Pass
                } else {
                    log.error(&format!(
                        "Database check failed: {} missing {}",
                        table.name,
                        missing.join(", ")
                    ));
                    CheckStatus::Fail(Failure::MissingColumns(missing))
                }
            }
            Err(e) => {
                let failure = state_failure(e);
                log.error(&format!("Database error on {}: {failure}", table.name));
                CheckStatus::Fail(failure)
            }
        };
        results.insert(table.name.clone(), status);
    }

    pool.close().await;
    results
}

fn state_failure(err: Error) -> Failure {
    match err {
        Error::State(e) => Failure::State(e),
        other => Failure::State(StateError::DatabaseError {
            message: other.to_string(),
        }),
    }
}
