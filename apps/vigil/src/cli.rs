//! Command line interface definition

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use vigil_config::{fixed_paths, RunOptions};

/// vigil - Deployment verification sweep
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verify files, database schemas, HTTP endpoints and file digests")]
#[command(long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Audit log file (appended to)
    #[arg(long, value_name = "PATH", default_value = fixed_paths::LOG_FILE)]
    pub log_file: PathBuf,

    /// Where to write the digest manifest (overwritten)
    #[arg(long, value_name = "PATH", default_value = fixed_paths::MANIFEST_FILE)]
    pub manifest_out: PathBuf,

    /// Per-request HTTP timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = fixed_paths::HTTP_TIMEOUT_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Number of endpoint requests in flight at once
    #[arg(long, value_name = "N", default_value_t = 1,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub jobs: u64,

    /// Previous manifest to compare digests against
    #[arg(long, value_name = "PATH")]
    pub baseline: Option<PathBuf>,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug diagnostics on stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Runtime knobs derived from the flags
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            log_file: self.log_file.clone(),
            manifest_path: self.manifest_out.clone(),
            baseline: self.baseline.clone(),
            http_timeout: Duration::from_secs(self.timeout),
            endpoint_jobs: usize::try_from(self.jobs).unwrap_or(usize::MAX),
        }
    }
}
