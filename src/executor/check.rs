//! Check driver
//!
//! Extracts each requested job into a shared [`ScriptWorkspace`], runs the
//! checker on it and sums the exit codes. Jobs are processed strictly in the
//! given order, one at a time. A failing checker never stops the run; a job
//! that cannot be extracted does.

use super::errors::CheckError;
use super::shell::{CheckCommand, CheckOutput};
use super::temp_files::ScriptWorkspace;
use crate::pipeline::{PipelineDocument, extract};
use serde::Serialize;
use std::io::Write;

/// Output and extraction settings for a check run
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// First line of every extracted script (empty to omit)
    pub shebang: String,
    /// Suppress the checker's captured output
    pub quiet: bool,
    /// Print progress lines around each step
    pub verbose: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            shebang: crate::pipeline::DEFAULT_SHEBANG.to_string(),
            quiet: false,
            verbose: false,
        }
    }
}

/// Result of checking one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Job name
    pub job: String,
    /// Command line that was executed
    pub command: String,
    /// Checker exit code
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Whether the checker was killed after its timeout
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub timed_out: bool,
    /// Wall-clock time of the checker run in milliseconds
    pub duration_ms: u64,
    /// Extraction warnings for this job
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Aggregate result of a check run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Per-job results in the order the jobs were checked
    pub jobs: Vec<JobReport>,
    /// Sum of all checker exit codes.
    ///
    /// Only zero versus non-zero is meaningful: different failures can add up
    /// to the same value.
    pub exit_code_sum: i64,
}

impl CheckReport {
    /// Returns true if every checker exited with code 0
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code_sum == 0
    }

    /// Jobs whose checker exited non-zero
    pub fn failed_jobs(&self) -> impl Iterator<Item = &JobReport> {
        self.jobs.iter().filter(|j| j.exit_code != 0)
    }

    fn record(&mut self, report: JobReport) {
        self.exit_code_sum += i64::from(report.exit_code);
        self.jobs.push(report);
    }
}

/// Runs a checker over extracted job scripts
#[derive(Debug)]
pub struct CheckRunner<'a> {
    document: &'a PipelineDocument,
    source: String,
    checker: CheckCommand,
    options: CheckOptions,
}

impl<'a> CheckRunner<'a> {
    /// Creates a runner for `document`; `source` names the document in
    /// progress output
    #[must_use]
    pub fn new(
        document: &'a PipelineDocument,
        source: impl Into<String>,
        checker: CheckCommand,
        options: CheckOptions,
    ) -> Self {
        Self {
            document,
            source: source.into(),
            checker,
            options,
        }
    }

    /// Checks `jobs` in order, writing progress and checker output to `out`
    ///
    /// The script workspace lives for the duration of this call and is
    /// removed before it returns, on success and on error.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError`] if a job cannot be extracted, the workspace
    /// cannot be written, the checker cannot be started, or `out` fails.
    pub fn run<S, W>(&self, jobs: &[S], out: &mut W) -> Result<CheckReport, CheckError>
    where
        S: AsRef<str>,
        W: Write,
    {
        let workspace = ScriptWorkspace::new().map_err(|e| CheckError::Workspace(e.to_string()))?;
        let mut report = CheckReport::default();

        for job in jobs {
            let job = job.as_ref();
            let result = self.check_job(&workspace, job, out)?;
            report.record(result);
        }

        if self.options.verbose {
            writeln!(out, "returncode sum {}", report.exit_code_sum).map_err(output_error)?;
        }

        tracing::info!(
            jobs = report.jobs.len(),
            failed = report.failed_jobs().count(),
            exit_code_sum = report.exit_code_sum,
            "Check run finished"
        );

        Ok(report)
    }

    fn check_job<W: Write>(
        &self,
        workspace: &ScriptWorkspace,
        job: &str,
        out: &mut W,
    ) -> Result<JobReport, CheckError> {
        if self.options.verbose {
            writeln!(out, "extract {job} from {}", self.source).map_err(output_error)?;
        }

        let script = extract(self.document, job, &self.options.shebang)?;
        let path = workspace
            .write_script(job, &script.to_script())
            .map_err(|e| CheckError::Workspace(e.to_string()))?;

        if self.options.verbose {
            writeln!(out, "run {}", self.checker.command_line(&path)).map_err(output_error)?;
        }

        let output = self.checker.run(&path, workspace.path())?;
        self.echo(&output, out)?;

        if self.options.verbose {
            writeln!(out, "returncode {}", output.exit_code).map_err(output_error)?;
        }

        Ok(JobReport {
            job: job.to_string(),
            command: output.command,
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            timed_out: output.timed_out,
            duration_ms: u64::try_from(output.duration.as_millis()).unwrap_or(u64::MAX),
            warnings: script.warnings.iter().map(ToString::to_string).collect(),
        })
    }

    fn echo<W: Write>(&self, output: &CheckOutput, out: &mut W) -> Result<(), CheckError> {
        if self.options.quiet {
            return Ok(());
        }
        for captured in [&output.stdout, &output.stderr] {
            let captured = captured.trim_end();
            if !captured.is_empty() {
                writeln!(out, "{captured}").map_err(output_error)?;
            }
        }
        Ok(())
    }
}

#[allow(clippy::needless_pass_by_value)]
fn output_error(err: std::io::Error) -> CheckError {
    CheckError::Output(err.to_string())
}
