#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Verification sweep orchestration for vigil
//!
//! This crate holds the four checkers and the orchestrator that runs them in
//! a fixed order: files, database schema, endpoints, manifest. Checkers never
//! depend on each other's output and never abort the sweep; every failure is
//! folded into a per-item status. The only errors surfaced to the caller are
//! failures to write the run's own artifacts.

mod context;
mod endpoints;
mod files;
mod manifest;
mod schema;
mod types;

pub use context::{VerifyContextBuilder, VerifyCtx};
pub use endpoints::check_endpoints;
pub use files::check_files;
pub use manifest::build_manifest;
pub use schema::{check_database, DATABASE_KEY};
pub use types::{CheckResults, CheckStatus, Failure, Verdict, VerificationReport};

use vigil_errors::{Error, StorageError};
use vigil_manifest::Manifest;

/// Run every check described by the context's config.
///
/// # Errors
///
/// Returns an error if the baseline manifest exists but cannot be parsed, or
/// if the new manifest cannot be written.
pub async fn run(ctx: &VerifyCtx) -> Result<VerificationReport, Error> {
    let config = &ctx.config;
    let log = ctx.log.as_ref();
    tracing::info!(
        files = config.files.len(),
        apis = config.apis.len(),
        manifest = config.manifest.len(),
        "Starting verification sweep"
    );

    let files = check_files(&config.files, log).await;

    let database = check_database(&config.database, log).await;

    let endpoints =
        check_endpoints(&ctx.net, &config.apis, ctx.options.endpoint_jobs, log).await;

    // The baseline may be the file about to be overwritten.
    let baseline = match &ctx.options.baseline {
        Some(path) => load_baseline(path, log).await?,
        None => None,
    };

    let manifest = build_manifest(&config.manifest, &ctx.options.manifest_path, log).await?;

    let drift = baseline
        .map(|baseline| manifest.drift(&baseline))
        .unwrap_or_default();
    for entry in &drift {
        log.error(&format!("Manifest drift for {}: {}", entry.path, entry.kind));
    }

    let report = VerificationReport {
        files,
        database,
        endpoints,
        manifest,
        manifest_path: ctx.options.manifest_path.clone(),
        drift,
    };
    tracing::info!(verdict = %report.verdict(), "Verification sweep finished");
    Ok(report)
}

async fn load_baseline(
    path: &std::path::Path,
    log: &dyn vigil_events::AuditSink,
) -> Result<Option<Manifest>, Error> {
    match Manifest::from_file(path).await {
        Ok(baseline) => Ok(Some(baseline)),
        Err(Error::Storage(StorageError::PathNotFound { .. })) => {
            log.info(&format!(
                "No baseline manifest at {}; skipping drift comparison",
                path.display()
            ));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
