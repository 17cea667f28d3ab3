//! Network-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("DNS lookup failed: {0}")]
    DnsFailure(String),

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("SSL/TLS error: {0}")]
    TlsError(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("status {status}")]
    HttpError { status: u16, message: String },
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } => Some("The endpoint did not answer within the request timeout."),
            Self::DnsFailure(_) => Some("Check the host name in the configured URL."),
            Self::ConnectionRefused(_) => Some("Check that the service is running and listening."),
            Self::InvalidUrl(_) => Some("Fix the URL in the config file."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Timeout { .. } => "network.timeout",
            Self::DnsFailure(_) => "network.dns_failure",
            Self::ConnectionRefused(_) => "network.connection_refused",
            Self::TlsError(_) => "network.tls_error",
            Self::InvalidUrl(_) => "network.invalid_url",
            Self::RequestFailed(_) => "network.request_failed",
            Self::HttpError { .. } => "network.http_error",
        };
        Some(code)
    }
}
