//! Error and warning types for script extraction

use thiserror::Error;

/// Errors that can occur while loading a pipeline document or extracting a job
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The document could not be read from disk
    #[error("Failed to read '{path}': {message}")]
    Io {
        /// Path of the document.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },

    /// The document is not valid YAML or not a mapping of jobs
    #[error("Failed to parse pipeline document: {0}")]
    Parse(String),

    /// The requested job is not a top-level key of the document
    #[error("Job '{job}' not found in pipeline document")]
    MissingJob {
        /// Name of the requested job.
        job: String,
    },

    /// A script entry has a shape that cannot be turned into a command line
    #[error("Job '{job}': unsupported entry in '{key}' (expected a string or a list of strings)")]
    UnsupportedEntry {
        /// Job the entry belongs to (the inherited job for extended content).
        job: String,
        /// Script key holding the entry.
        key: String,
    },
}

impl From<serde_yaml::Error> for ExtractError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Non-fatal conditions observed during extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractWarning {
    /// `extends` names a job that is not in the document
    #[error("job to extend not available: ignoring ('{job}' extends '{target}')")]
    MissingExtendsTarget {
        /// Job carrying the `extends` key.
        job: String,
        /// Referenced job name.
        target: String,
    },

    /// `extends` is present but is not a single job name
    #[error("extends of job '{job}' is not a single job name: ignoring")]
    InvalidExtends {
        /// Job carrying the `extends` key.
        job: String,
    },
}
