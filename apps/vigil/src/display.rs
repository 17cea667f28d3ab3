//! Output rendering and formatting

use std::io::{self, Write};
use vigil_ops::{CheckResults, VerificationReport};

/// Output renderer for sweep reports
#[derive(Clone, Copy)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool) -> Self {
        Self { json_output }
    }

    /// Print the results header ahead of the per-check audit lines.
    pub fn render_header(&self) -> io::Result<()> {
        if self.json_output {
            return Ok(());
        }
        let stdout = io::stdout();
        let mut out = stdout.lock();
        Self::write_header(&mut out)
    }

    fn write_header(out: &mut impl Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "[Verification Results]")
    }

    /// Render the report to stdout
    pub fn render_report(&self, report: &VerificationReport) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if self.json_output {
            Self::render_json(&mut out, report)
        } else {
            Self::render_text(&mut out, report)
        }
    }

    /// Render as JSON
    fn render_json(out: &mut impl Write, report: &VerificationReport) -> io::Result<()> {
        let json = report.to_json().map_err(io::Error::other)?;
        writeln!(out, "{json}")
    }

    /// Render as labeled text lines
    fn render_text(out: &mut impl Write, report: &VerificationReport) -> io::Result<()> {
        Self::render_section(out, "File", &report.files)?;
        Self::render_section(out, "Database", &report.database)?;
        Self::render_section(out, "API", &report.endpoints)?;

        writeln!(
            out,
            "Manifest generated -> {}",
            report.manifest_path.display()
        )?;
        for drift in &report.drift {
            writeln!(out, "Drift: {} -> {}", drift.path, drift.kind)?;
        }

        writeln!(out, "{}", report.verdict())
    }

    fn render_section(out: &mut impl Write, label: &str, results: &CheckResults) -> io::Result<()> {
        for (key, status) in results.iter() {
            writeln!(out, "{label}: {key} -> {status}")?;
        }
        Ok(())
    }
}
