//! Prelude module for common imports

pub use crate::executor::{CheckCommand, CheckError, CheckOptions, CheckReport, CheckRunner};
pub use crate::infrastructure::Config;
pub use crate::pipeline::{
    DEFAULT_SHEBANG, ExtractError, ExtractWarning, ExtractedScript, PipelineDocument, ScriptKey,
    discover_jobs, extract,
};
