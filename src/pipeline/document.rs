//! Pipeline document loading
//!
//! A pipeline document is a YAML mapping from job name to job definition.
//! Anchors and aliases are resolved by the parser and `<<` merge keys are
//! applied on load, so `extends` is the only inheritance left to resolve.

use super::errors::ExtractError;
use super::script::ScriptKey;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A parsed pipeline document, read-only after loading
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDocument {
    jobs: Mapping,
}

impl PipelineDocument {
    /// Reads and parses a pipeline document from disk
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the file cannot be read and
    /// [`ExtractError::Parse`] if it is not a YAML mapping.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let content = fs::read_to_string(path).map_err(|e| ExtractError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "Parsing pipeline document");
        content.parse()
    }

    /// Looks up a job by name
    #[must_use]
    pub fn job(&self, name: &str) -> Option<Job<'_>> {
        self.jobs.iter().find_map(|(key, definition)| {
            let key = key.as_str()?;
            (key == name).then_some(Job {
                name: key,
                definition,
            })
        })
    }
}

impl FromStr for PipelineDocument {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut value: Value = serde_yaml::from_str(s)?;
        value.apply_merge()?;
        match value {
            Value::Mapping(jobs) => Ok(Self { jobs }),
            // An empty file has no jobs rather than being an error
            Value::Null => Ok(Self {
                jobs: Mapping::new(),
            }),
            other => Err(ExtractError::Parse(format!(
                "expected a mapping of jobs at the top level, found {}",
                kind(&other)
            ))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Borrowed view of one job definition
///
/// Top-level keys that are not mappings (`stages:`, `variables:` lists and
/// the like) are still addressable as jobs; they simply carry no script keys.
#[derive(Debug, Clone, Copy)]
pub struct Job<'a> {
    name: &'a str,
    definition: &'a Value,
}

impl<'a> Job<'a> {
    /// Job name
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Raw `extends` value, if present
    #[must_use]
    pub fn extends(&self) -> Option<&'a Value> {
        self.definition.as_mapping()?.get("extends")
    }

    /// Raw value of one script key, if present on this job
    #[must_use]
    pub fn script(&self, key: ScriptKey) -> Option<&'a Value> {
        self.definition.as_mapping()?.get(key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const CI: &str = r"
stages:
  - test

.defaults: &defaults
  before_script:
    - echo setup

lint:
  <<: *defaults
  script:
    - echo lint
";

    #[test]
    fn test_parse_top_level_keys_as_jobs() {
        let doc: PipelineDocument = CI.parse().unwrap();
        for name in ["stages", ".defaults", "lint"] {
            assert_eq!(doc.job(name).unwrap().name(), name);
        }
        assert!(doc.job("deploy").is_none());
    }

    #[test]
    fn test_merge_keys_are_applied() {
        let doc: PipelineDocument = CI.parse().unwrap();
        let lint = doc.job("lint").unwrap();
        assert!(lint.script(ScriptKey::BeforeScript).is_some());
        assert!(lint.script(ScriptKey::Script).is_some());
        assert!(lint.script(ScriptKey::AfterScript).is_none());
    }

    #[test]
    fn test_non_mapping_job_has_no_script_keys() {
        let doc: PipelineDocument = CI.parse().unwrap();
        let stages = doc.job("stages").unwrap();
        assert!(stages.extends().is_none());
        assert!(ScriptKey::ALL.iter().all(|k| stages.script(*k).is_none()));
    }

    #[test]
    fn test_top_level_list_is_rejected() {
        let err = "- a\n- b\n".parse::<PipelineDocument>().unwrap_err();
        assert!(matches!(err, ExtractError::Parse(msg) if msg.contains("a list")));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = "job: [unclosed".parse::<PipelineDocument>().unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[test]
    fn test_empty_document_has_no_jobs() {
        let doc: PipelineDocument = "".parse().unwrap();
        assert_eq!(doc, PipelineDocument { jobs: Mapping::new() });
    }

    #[test]
    fn test_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".gitlab-ci.yml");
        fs::write(&path, CI).unwrap();

        let doc = PipelineDocument::from_path(&path).unwrap();
        assert!(doc.job("lint").is_some());
        assert!(doc.job("deploy").is_none());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = PipelineDocument::from_path(Path::new("/nonexistent/.gitlab-ci.yml")).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
