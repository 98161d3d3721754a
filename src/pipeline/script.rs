//! Script-bearing job keys and flattening of their values

use serde_yaml::Value;
use std::fmt;
use thiserror::Error;

/// The three job keys that carry shell commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKey {
    /// `before_script`
    BeforeScript,
    /// `script`
    Script,
    /// `after_script`
    AfterScript,
}

impl ScriptKey {
    /// All keys in extraction order.
    pub const ALL: [ScriptKey; 3] = [Self::BeforeScript, Self::Script, Self::AfterScript];

    /// Key as written in the pipeline document
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeScript => "before_script",
            Self::Script => "script",
            Self::AfterScript => "after_script",
        }
    }
}

impl fmt::Display for ScriptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A script value contained something other than scalars and lists
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unsupported script entry")]
pub struct UnsupportedValue;

/// Flattens a script value into trimmed command lines.
///
/// A single string yields one line. Lists are walked depth-first so
/// `[["a"], ["b", ["c"]]]` becomes `["a", "b", "c"]`. Nulls are skipped,
/// numbers and booleans are kept as their YAML text. Mappings and tagged
/// values are rejected.
///
/// # Errors
///
/// Returns [`UnsupportedValue`] if a mapping or tagged value is encountered.
pub fn flatten(value: &Value) -> Result<Vec<String>, UnsupportedValue> {
    let mut lines = Vec::new();
    flatten_into(value, &mut lines)?;
    Ok(lines)
}

fn flatten_into(value: &Value, lines: &mut Vec<String>) -> Result<(), UnsupportedValue> {
    match value {
        Value::Null => {}
        Value::String(s) => lines.push(s.trim().to_string()),
        Value::Bool(b) => lines.push(b.to_string()),
        Value::Number(n) => lines.push(n.to_string()),
        Value::Sequence(items) => {
            for item in items {
                flatten_into(item, lines)?;
            }
        }
        Value::Mapping(_) | Value::Tagged(_) => return Err(UnsupportedValue),
    }
    Ok(())
}
