//! HTTP client used for endpoint checks

use reqwest::{Client, StatusCode};
use std::error::Error as StdError;
use std::time::Duration;
use vigil_errors::{Error, NetworkError};

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// Budget for a whole request, connect through body
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            user_agent: format!("vigil/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client wrapper for liveness checks
#[derive(Debug, Clone)]
pub struct NetClient {
    client: Client,
    config: NetConfig,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::RequestFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(NetConfig::default())
    }

    /// Issue a single GET and return the response status.
    ///
    /// Any status, including 4xx and 5xx, is a successful request at this level;
    /// only transport failures are errors.
    ///
    /// # Errors
    ///
    /// Returns a classified `NetworkError` when no response was received.
    pub async fn fetch_status(&self, url: &str) -> Result<StatusCode, NetworkError> {
        tracing::debug!(url, timeout = ?self.config.timeout, "Probing endpoint");
        match self.client.get(url).send().await {
            Ok(response) => Ok(response.status()),
            Err(e) => Err(classify(&e, url)),
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }
}

/// Map a reqwest error onto the transport failure it represents.
fn classify(error: &reqwest::Error, url: &str) -> NetworkError {
    let detail = error_chain(error);

    if error.is_builder() {
        return NetworkError::InvalidUrl(detail);
    }
    if error.is_timeout() {
        return NetworkError::Timeout {
            url: url.to_string(),
        };
    }
    if error.is_connect() {
        // The top-level message embeds the URL, which may itself contain "ssl" or "tls".
        let lowered = source_chain(error).to_lowercase();
        if lowered.contains("dns error") || lowered.contains("failed to lookup address") {
            return NetworkError::DnsFailure(detail);
        }
        if ["certificate", "tls", "ssl", "handshake"]
            .iter()
            .any(|needle| lowered.contains(needle))
        {
            return NetworkError::TlsError(detail);
        }
        return NetworkError::ConnectionRefused(detail);
    }
    NetworkError::RequestFailed(detail)
}

/// Render an error with all of its sources, outermost first.
fn error_chain(error: &reqwest::Error) -> String {
    let mut text = error.to_string();
    append_causes(&mut text, error.source());
    text
}

/// Render only the underlying causes of an error, without its own message.
fn source_chain(error: &reqwest::Error) -> String {
    let mut text = String::new();
    append_causes(&mut text, error.source());
    text
}

fn append_causes(text: &mut String, mut source: Option<&(dyn StdError + 'static)>) {
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            if !text.is_empty() {
                text.push_str(": ");
            }
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
}
