//! CLI error handling

use std::fmt;

use vigil_errors::UserFacingError;

/// Exit status for a configuration that could not be loaded
pub const EXIT_CONFIG: i32 = 2;
/// Exit status for failed checks and every other error
pub const EXIT_FAILURE: i32 = 1;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration file missing or malformed
    Config(vigil_errors::ConfigError),
    /// Sweep or artifact error
    Ops(vigil_errors::Error),
    /// Writing to stdout failed
    Io(std::io::Error),
}

impl CliError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => EXIT_CONFIG,
            CliError::Ops(_) | CliError::Io(_) => EXIT_FAILURE,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => {
                write!(f, "Configuration error: {e}")?;
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            CliError::Ops(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Ops(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<vigil_errors::ConfigError> for CliError {
    fn from(e: vigil_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<vigil_errors::Error> for CliError {
    fn from(e: vigil_errors::Error) -> Self {
        match e {
            vigil_errors::Error::Config(e) => CliError::Config(e),
            other => CliError::Ops(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
