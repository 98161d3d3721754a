//! `yaml2script check` / `yaml2script all` - Check job scripts
//!
//! Each job is extracted into a temporary directory and handed to the check
//! command (by default `shellcheck`). The exit codes of all check runs are
//! summed; any non-zero sum fails the command.
//!
//! ## Usage
//!
//! ```bash
//! yaml2script check .gitlab-ci.yml build test --parameter-check-command='-e SC1091'
//! yaml2script all .gitlab-ci.yml --verbose
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use yaml2script::{
    CheckCommand, CheckOptions, CheckReport, CheckRunner, PipelineDocument, discover_jobs,
};

/// How the result of a check run is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Checker output and progress lines as they happen
    Text,
    /// A single JSON report after all jobs ran
    Json,
}

/// Resolved settings for a check run
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub shebang: String,
    pub check_command: String,
    pub parameters: Vec<String>,
    pub timeout: Option<Duration>,
    pub quiet: bool,
    pub verbose: bool,
    pub format: ReportFormat,
}

/// Checks the given jobs of a pipeline file
pub fn check_jobs(file: &Path, jobs: &[String], settings: &CheckSettings) -> Result<CheckReport> {
    let document = PipelineDocument::from_path(file)?;
    run_checks(&document, file, jobs, settings)
}

/// Checks every top-level `name:` key of a pipeline file
///
/// Job names come from a line scan of the raw text, not from the parsed
/// document, so global sections written as `name:` are checked too.
pub fn check_all(file: &Path, settings: &CheckSettings) -> Result<CheckReport> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    let document: PipelineDocument = content
        .parse()
        .with_context(|| format!("Failed to parse file: {}", file.display()))?;

    let jobs = discover_jobs(&content);
    if jobs.is_empty() {
        tracing::warn!("No top-level keys found in {}", file.display());
    }
    tracing::debug!(jobs = ?jobs, "Discovered jobs");

    run_checks(&document, file, &jobs, settings)
}

fn run_checks(
    document: &PipelineDocument,
    file: &Path,
    jobs: &[String],
    settings: &CheckSettings,
) -> Result<CheckReport> {
    let checker = CheckCommand::new(&settings.check_command)
        .parameters(settings.parameters.iter().cloned())
        .timeout(settings.timeout);

    let json = settings.format == ReportFormat::Json;
    let options = CheckOptions {
        shebang: settings.shebang.clone(),
        quiet: settings.quiet || json,
        verbose: settings.verbose && !json,
    };

    let runner = CheckRunner::new(document, file.display().to_string(), checker, options);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = runner
        .run(jobs, &mut out)
        .with_context(|| format!("Check failed for: {}", file.display()))?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to serialize check report")?;
        writeln!(out, "{rendered}").context("Failed to write check report")?;
    }

    Ok(report)
}

/// Process exit code for a check report
///
/// The sum of checker exit codes is clamped into `1..=255` so a failing run
/// never wraps around to success.
pub fn exit_code(report: &CheckReport) -> ExitCode {
    ExitCode::from(exit_status(report))
}

fn exit_status(report: &CheckReport) -> u8 {
    if report.is_success() {
        0
    } else {
        u8::try_from(report.exit_code_sum.clamp(1, 255)).unwrap_or(u8::MAX)
    }
}
