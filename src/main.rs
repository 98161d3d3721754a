//! yaml2script - check the shell scripts embedded in a `.gitlab-ci.yml`
//!
//! ## Commands
//!
//! - `yaml2script extract` - Print the script of one job
//! - `yaml2script check` - Check the scripts of the given jobs
//! - `yaml2script all` - Check the scripts of every top-level key
//! - `yaml2script version` - Print version information
//! - `yaml2script completions` - Generate shell completions
//!
//! ## Quick Start
//!
//! ```bash
//! # Print the script of a job
//! yaml2script extract .gitlab-ci.yml pre-commit
//!
//! # Run shellcheck on two jobs
//! yaml2script check .gitlab-ci.yml build test
//!
//! # Check everything, with a custom checker
//! yaml2script all .gitlab-ci.yml --check-command 'sh -n' --verbose
//! ```
//!
//! ## Environment
//!
//! - `YAML2SCRIPT_CONFIG` - YAML file with default settings
//! - `YAML2SCRIPT_LOG` - log filter (e.g. `debug`)
//! - `YAML2SCRIPT_VERBOSE` - print the full error chain on failure

use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if std::env::var("YAML2SCRIPT_VERBOSE").is_ok() {
                eprintln!("{e:?}");
            }
            ExitCode::FAILURE
        }
    }
}
