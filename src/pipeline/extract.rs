//! Job script extraction
//!
//! Resolves a single `extends` hop and concatenates `before_script`,
//! `script` and `after_script` into one flat script.

use super::document::{Job, PipelineDocument};
use super::errors::{ExtractError, ExtractWarning};
use super::script::{ScriptKey, flatten};
use serde_yaml::Value;

/// Default first line of an extracted script.
pub const DEFAULT_SHEBANG: &str = "#!/usr/bin/env sh";

/// Result of extracting one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedScript {
    /// Job the script was extracted from.
    pub job: String,
    /// Script lines, shebang first when one was requested.
    pub lines: Vec<String>,
    /// Non-fatal problems encountered while resolving `extends`.
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractedScript {
    /// Joins the lines into script text (newline separated, no trailing newline)
    #[must_use]
    pub fn to_script(&self) -> String {
        self.lines.join("\n")
    }
}

/// Extracts the script of `job_name` from `document`.
///
/// Script keys of the job named by `extends` are used as defaults; each key
/// present on the job itself replaces the inherited value entirely. Only one
/// level of `extends` is followed. An empty `shebang` is omitted.
///
/// # Errors
///
/// Returns [`ExtractError::MissingJob`] if the job is not in the document and
/// [`ExtractError::UnsupportedEntry`] if a script value cannot be flattened.
pub fn extract(
    document: &PipelineDocument,
    job_name: &str,
    shebang: &str,
) -> Result<ExtractedScript, ExtractError> {
    let job = document
        .job(job_name)
        .ok_or_else(|| ExtractError::MissingJob {
            job: job_name.to_string(),
        })?;

    let mut warnings = Vec::new();
    let parent = resolve_extends(document, job, &mut warnings);

    let mut lines = Vec::new();
    let shebang = shebang.trim();
    if !shebang.is_empty() {
        lines.push(shebang.to_string());
    }

    for key in ScriptKey::ALL {
        let source = job
            .script(key)
            .map(|value| (job, value))
            .or_else(|| parent.and_then(|p| p.script(key).map(|value| (p, value))));

        if let Some((owner, value)) = source {
            lines.extend(flatten_block(owner, key, value)?);
        }
    }

    tracing::debug!(job = job_name, lines = lines.len(), "Extracted script");

    Ok(ExtractedScript {
        job: job_name.to_string(),
        lines,
        warnings,
    })
}

fn resolve_extends<'a>(
    document: &'a PipelineDocument,
    job: Job<'a>,
    warnings: &mut Vec<ExtractWarning>,
) -> Option<Job<'a>> {
    let extends = job.extends()?;

    let Some(target) = extends.as_str() else {
        let warning = ExtractWarning::InvalidExtends {
            job: job.name().to_string(),
        };
        tracing::warn!("{warning}");
        warnings.push(warning);
        return None;
    };

    let parent = document.job(target);
    if parent.is_none() {
        let warning = ExtractWarning::MissingExtendsTarget {
            job: job.name().to_string(),
            target: target.to_string(),
        };
        tracing::warn!("{warning}");
        warnings.push(warning);
    }
    parent
}

fn flatten_block(owner: Job<'_>, key: ScriptKey, value: &Value) -> Result<Vec<String>, ExtractError> {
    flatten(value).map_err(|_| ExtractError::UnsupportedEntry {
        job: owner.name().to_string(),
        key: key.to_string(),
    })
}
