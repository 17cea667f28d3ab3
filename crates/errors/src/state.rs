//! Database error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("unable to open database {path}: {message}")]
    ConnectionFailed { path: String, message: String },

    #[error("no such table: {table}")]
    TableNotFound { table: String },

    #[error("database error: {message}")]
    DatabaseError { message: String },

    #[error("transaction failed: {message}")]
    TransactionFailed { message: String },
}

impl UserFacingError for StateError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ConnectionFailed { .. } => {
                Some("Check the database path; run `vigil-seed` to create a sample database.")
            }
            Self::TableNotFound { .. } => Some("Create the table or drop it from the config."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ConnectionFailed { .. } => "state.connection_failed",
            Self::TableNotFound { .. } => "state.table_not_found",
            Self::DatabaseError { .. } => "state.database_error",
            Self::TransactionFailed { .. } => "state.transaction_failed",
        };
        Some(code)
    }
}
