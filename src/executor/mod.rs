//! Check driver
//!
//! This module writes extracted scripts to a scoped workspace and hands them
//! to an external checker.

mod check;
mod errors;
mod shell;
mod temp_files;

pub use check::{CheckOptions, CheckReport, CheckRunner, JobReport};
pub use errors::CheckError;
pub use shell::{CheckCommand, CheckOutput, TIMEOUT_EXIT_CODE};
pub use temp_files::ScriptWorkspace;
