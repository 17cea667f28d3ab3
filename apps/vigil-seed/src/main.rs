//! vigil-seed - sample database utility for vigil
//!
//! Recreates a `users` table with two known rows so schema checks have
//! something to inspect.

use clap::Parser;
use std::path::PathBuf;
use vigil_state::seed_sample_database;

#[derive(Parser)]
#[command(name = "vigil-seed")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Create or reset the sample users database", long_about = None)]
struct Cli {
    /// Database file to create or reset
    #[arg(value_name = "DB_PATH", default_value = "dummy.db")]
    path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let report = seed_sample_database(&cli.path).await?;
    println!(
        "{} initialized successfully ({} rows)",
        report.path.display(),
        report.rows
    );
    Ok(())
}
