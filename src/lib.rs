//! # yaml2script - check the shell in your CI pipeline
//!
//! yaml2script extracts the `before_script`, `script` and `after_script`
//! commands of a job from a `.gitlab-ci.yml` file and turns them into a
//! plain shell script, so the commands can be analyzed with ordinary shell
//! tools such as `shellcheck`.
//!
//! ## Quick Start
//!
//! ```rust
//! use yaml2script::{DEFAULT_SHEBANG, PipelineDocument, extract};
//!
//! let document: PipelineDocument = "pre-commit:\n  script:\n    - echo hi\n".parse().unwrap();
//! let script = extract(&document, "pre-commit", DEFAULT_SHEBANG).unwrap();
//! assert_eq!(script.to_script(), "#!/usr/bin/env sh\necho hi");
//! ```
//!
//! ## Features
//!
//! - **`extends`**: script keys of the extended job are used as defaults,
//!   one level deep
//! - **Nested lists**: arbitrarily nested command lists (as produced by YAML
//!   anchors) are flattened in order
//! - **Checking**: [`CheckRunner`] writes every script to a scoped temporary
//!   directory and runs a checker on it
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <https://www.apache.org/licenses/LICENSE-2.0>)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or <https://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod executor;
pub mod infrastructure;
pub mod pipeline;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use executor::{
    CheckCommand, CheckError, CheckOptions, CheckOutput, CheckReport, CheckRunner, JobReport,
    ScriptWorkspace,
};
pub use infrastructure::{Config, ConfigError, init_logging};
pub use pipeline::{
    DEFAULT_SHEBANG, ExtractError, ExtractWarning, ExtractedScript, PipelineDocument, ScriptKey,
    discover_jobs, extract,
};

/// Version of the yaml2script crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
