//! Fixed output locations, relative to the working directory of the run
//!
//! The log and manifest paths are part of the tool's external contract; the
//! CLI can redirect them but the config file cannot.

pub const LOG_FILE: &str = "logs/verify.log";

pub const MANIFEST_FILE: &str = "manifest.json";

/// Per-request budget for endpoint requests, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 5;
