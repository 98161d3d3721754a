//! Pipeline document model and script extraction

pub mod discovery;
pub mod document;
pub mod errors;
pub mod extract;
pub mod script;

// Re-export public types from submodules
pub use discovery::discover_jobs;
pub use document::{Job, PipelineDocument};
pub use errors::{ExtractError, ExtractWarning};
pub use extract::{DEFAULT_SHEBANG, ExtractedScript, extract};
pub use script::{ScriptKey, UnsupportedValue, flatten};
