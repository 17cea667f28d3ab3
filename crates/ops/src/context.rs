//! Verification context for dependency injection

use std::sync::Arc;

use vigil_config::{Config, RunOptions};
use vigil_errors::Error;
use vigil_events::AuditSink;
use vigil_net::{NetClient, NetConfig};

/// Everything a sweep needs, owned for the duration of the run
pub struct VerifyCtx {
    /// What to verify; read-only once the run starts
    pub config: Config,
    /// Output locations and endpoint knobs
    pub options: RunOptions,
    /// Endpoint HTTP client
    pub net: NetClient,
    /// Audit sink every checker records through
    pub log: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for VerifyCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyCtx")
            .field("config", &self.config)
            .field("options", &self.options)
            .field("net", &self.net)
            .finish_non_exhaustive()
    }
}

/// Builder for [`VerifyCtx`]
#[derive(Default)]
pub struct VerifyContextBuilder {
    config: Option<Config>,
    options: Option<RunOptions>,
    net: Option<NetClient>,
    log: Option<Arc<dyn AuditSink>>,
}

impl VerifyContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Set run options
    #[must_use]
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set network client
    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = Some(net);
        self
    }

    /// Set audit sink
    #[must_use]
    pub fn with_log(mut self, log: Arc<dyn AuditSink>) -> Self {
        self.log = Some(log);
        self
    }

    /// Build the context
    ///
    /// Options default to [`RunOptions::default`]; without an explicit client
    /// one is built from the options' HTTP timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or audit sink is missing, or the HTTP
    /// client cannot be created.
    pub fn build(self) -> Result<VerifyCtx, Error> {
        let config = self
            .config
            .ok_or_else(|| Error::internal("missing component: config"))?;

        let log = self
            .log
            .ok_or_else(|| Error::internal("missing component: audit sink"))?;

        let options = self.options.unwrap_or_default();

        let net = match self.net {
            Some(net) => net,
            None => NetClient::new(NetConfig {
                timeout: options.http_timeout,
                ..NetConfig::default()
            })?,
        };

        Ok(VerifyCtx {
            config,
            options,
            net,
            log,
        })
    }
}
