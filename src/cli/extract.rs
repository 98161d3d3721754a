//! `yaml2script extract` - Print the script of one job
//!
//! ## Usage
//!
//! ```bash
//! yaml2script extract .gitlab-ci.yml pre-commit
//! yaml2script extract .gitlab-ci.yml pre-commit --shebang='#!/usr/bin/env bash'
//! ```

use anyhow::{Context, Result};
use std::path::Path;
use yaml2script::{PipelineDocument, extract};

/// Extracts `job` from the pipeline file and returns the script text
pub fn extract_job(file: &Path, job: &str, shebang: &str) -> Result<String> {
    let document = PipelineDocument::from_path(file)?;
    let script = extract(&document, job, shebang)
        .with_context(|| format!("Failed to extract job from: {}", file.display()))?;
    Ok(script.to_script())
}
