//! Scoped workspace for extracted scripts
//!
//! Every check run writes its scripts into one temporary directory that is
//! removed when the [`ScriptWorkspace`] is dropped, whether the run
//! finished, returned early with an error, or unwound.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory holding one script file per job
///
/// # Example
///
/// ```rust
/// use yaml2script::ScriptWorkspace;
///
/// let workspace = ScriptWorkspace::new().unwrap();
/// let path = workspace.write_script("build", "#!/usr/bin/env sh\nmake").unwrap();
/// assert!(path.starts_with(workspace.path()));
///
/// let dir = workspace.path().to_path_buf();
/// drop(workspace);
/// assert!(!dir.exists());
/// ```
#[derive(Debug)]
pub struct ScriptWorkspace {
    dir: TempDir,
}

impl ScriptWorkspace {
    /// Creates a new workspace under the system temp directory
    ///
    /// # Errors
    ///
    /// Returns `std::io::Error` if the directory cannot be created
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("yaml2script-").tempdir()?;
        tracing::debug!(path = %dir.path().display(), "Created script workspace");
        Ok(Self { dir })
    }

    /// Writes a job's script and returns the file path
    ///
    /// The file is named after the job. Path separators in the job name are
    /// replaced so the file always lands directly in the workspace.
    ///
    /// # Errors
    ///
    /// Returns `std::io::Error` if the file cannot be written
    pub fn write_script(&self, job: &str, content: &str) -> std::io::Result<PathBuf> {
        let file_path = self.dir.path().join(script_file_name(job));
        fs::write(&file_path, content)?;
        Ok(file_path)
    }

    /// Gets the path to the workspace directory
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn script_file_name(job: &str) -> String {
    let name: String = job
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    match name.as_str() {
        "" | "." | ".." => format!("job{name}"),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_script_named_after_job() {
        let workspace = ScriptWorkspace::new().unwrap();
        let path = workspace.write_script("pre-commit", "echo hi").unwrap();

        assert_eq!(path, workspace.path().join("pre-commit"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "echo hi");
    }

    #[test]
    fn test_write_script_overwrites() {
        let workspace = ScriptWorkspace::new().unwrap();
        workspace.write_script("job", "first").unwrap();
        let path = workspace.write_script("job", "second").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_path_separators_are_replaced() {
        let workspace = ScriptWorkspace::new().unwrap();
        let path = workspace.write_script("test/unit", "true").unwrap();
        assert_eq!(path.parent().unwrap(), workspace.path());
        assert_eq!(path.file_name().unwrap(), "test_unit");
    }

    #[test]
    fn test_dot_names_stay_inside_workspace() {
        assert_eq!(script_file_name(".."), "job..");
        assert_eq!(script_file_name(""), "job");
        assert_eq!(script_file_name(".template"), ".template");
    }

    #[test]
    fn test_drop_removes_directory() {
        let workspace = ScriptWorkspace::new().unwrap();
        workspace.write_script("a", "echo a").unwrap();
        let dir = workspace.path().to_path_buf();
        assert!(dir.exists());

        drop(workspace);
        assert!(!dir.exists());
    }
}
