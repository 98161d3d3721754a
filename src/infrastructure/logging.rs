//! Logging configuration
//!
//! Initializes tracing for the application. Events go to stderr so stdout
//! carries only scripts and reports.

/// Environment variable holding an `EnvFilter` directive that overrides the
/// configured level.
pub const LOG_ENV: &str = "YAML2SCRIPT_LOG";

/// Initializes logging with the specified level
///
/// Does nothing if a global subscriber is already installed.
pub fn init_logging(level: &str) {
    use std::io::IsTerminal;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging("debug");
        init_logging("warn");
    }
}
