//! Error types for the check driver

use crate::pipeline::ExtractError;
use thiserror::Error;

/// Errors that abort a check run
///
/// A checker that runs and exits non-zero is not an error; its exit code is
/// recorded in the report instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// A job could not be extracted
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The script workspace could not be created or written
    #[error("Script workspace error: {0}")]
    Workspace(String),

    /// The checker process could not be started or waited on
    #[error("Failed to run '{command}': {message}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Underlying I/O error message.
        message: String,
    },

    /// Writing progress or checker output failed
    #[error("Failed to write output: {0}")]
    Output(String),
}
