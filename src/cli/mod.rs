//! CLI for yaml2script
//!
//! Subcommands:
//! - `extract`: Print the script of one job
//! - `check`: Check the scripts of the given jobs with an external tool
//! - `all`: Check the scripts of every top-level key
//! - `version`: Print version information
//! - `completions`: Generate shell completions

pub mod check;
pub mod completions;
pub mod extract;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use yaml2script::{Config, init_logging};

const EXAMPLES: &str = "\
Examples:
  yaml2script extract .gitlab-ci.yml pre-commit
  yaml2script check .gitlab-ci.yml pre-commit build --parameter-check-command='-e SC1091'
  yaml2script all .gitlab-ci.yml --verbose";

/// CLI arguments for yaml2script
#[derive(Parser, Debug)]
#[command(name = "yaml2script")]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES, arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the script of one job to stdout
    Extract {
        /// Pipeline file (e.g. .gitlab-ci.yml)
        file: PathBuf,
        /// Job to extract
        job: String,
        /// First line of the script; pass an empty string to omit it
        #[arg(long)]
        shebang: Option<String>,
    },

    /// Check the scripts of the given jobs
    Check {
        /// Pipeline file (e.g. .gitlab-ci.yml)
        file: PathBuf,
        /// Jobs to extract and check
        #[arg(required = true)]
        jobs: Vec<String>,
        #[command(flatten)]
        check: CheckArgs,
    },

    /// Check the scripts of every top-level `name:` key
    ///
    /// Keys are found by scanning the file line by line, so global sections
    /// such as `variables:` are checked as if they were jobs.
    All {
        /// Pipeline file (e.g. .gitlab-ci.yml)
        file: PathBuf,
        #[command(flatten)]
        check: CheckArgs,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: ShellArg,
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// First line of every script; pass an empty string to omit it
    #[arg(long)]
    shebang: Option<String>,
    /// Tool used to check the scripts [default: shellcheck]
    #[arg(long)]
    check_command: Option<String>,
    /// Parameter for the check command (repeatable)
    #[arg(long, allow_hyphen_values = true)]
    parameter_check_command: Vec<String>,
    /// Kill a check command after this many seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,
    /// No output from the check command
    #[arg(short, long)]
    quiet: bool,
    /// Print each step and its return code
    #[arg(short, long)]
    verbose: bool,
    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormatArg::Text)]
    format: ReportFormatArg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormatArg {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ShellArg {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Single-dash option spellings accepted for compatibility
const LEGACY_OPTIONS: [(&str, &str); 5] = [
    ("-shebang", "--shebang"),
    ("-check_command", "--check-command"),
    ("-parameter_check_command", "--parameter-check-command"),
    ("-quiet", "--quiet"),
    ("-verbose", "--verbose"),
];

const PARAMETER_OPTION: &str = "--parameter-check-command";

/// Rewrites legacy single-dash options into their `--long` form.
///
/// `-parameter_check_command` takes every following value that does not
/// look like an option (values containing a space, such as `-e SC1091`,
/// count as values), so each one becomes `--parameter-check-command=<value>`.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Vec::new();
    let mut iter = args.into_iter().peekable();

    while let Some(arg) = iter.next() {
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            normalized.push(arg);
            normalized.extend(iter.by_ref());
            break;
        }

        let (flag, value) = match text.split_once('=') {
            Some((flag, value)) => (flag, Some(value)),
            None => (text, None),
        };
        let flag = LEGACY_OPTIONS
            .iter()
            .find(|(legacy, _)| *legacy == flag)
            .map_or(flag, |(_, long)| *long);

        match value {
            Some(value) => normalized.push(format!("{flag}={value}").into()),
            None if flag == PARAMETER_OPTION => {
                let mut consumed = false;
                while let Some(next) = iter.next_if(|next| is_parameter_value(next)) {
                    let mut joined = OsString::from(format!("{flag}="));
                    joined.push(next);
                    normalized.push(joined);
                    consumed = true;
                }
                if !consumed {
                    normalized.push(flag.into());
                }
            }
            None => normalized.push(flag.into()),
        }
    }

    normalized
}

fn is_parameter_value(arg: &OsString) -> bool {
    arg.to_str()
        .is_none_or(|s| !s.starts_with('-') || s.contains(' '))
}

/// Parse and execute CLI arguments
pub fn run() -> Result<ExitCode> {
    let args = match Args::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return Ok(match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            });
        }
    };

    let config = Config::from_env().context("Failed to load configuration")?;
    init_logging(&config.log_level);

    match args.command {
        Command::Extract { file, job, shebang } => {
            let shebang = shebang.unwrap_or_else(|| config.shebang.clone());
            let script = extract::extract_job(&file, &job, &shebang)?;
            println!("{script}");
        }
        Command::Check { file, jobs, check } => {
            let settings = check.into_settings(&config);
            let report = check::check_jobs(&file, &jobs, &settings)?;
            return Ok(check::exit_code(&report));
        }
        Command::All { file, check } => {
            let settings = check.into_settings(&config);
            let report = check::check_all(&file, &settings)?;
            return Ok(check::exit_code(&report));
        }
        Command::Version => {
            println!("yaml2script version {}", yaml2script::VERSION);
        }
        Command::Completions { shell, output } => {
            use clap_complete::Shell;

            let shell_enum = match shell {
                ShellArg::Bash => Shell::Bash,
                ShellArg::Zsh => Shell::Zsh,
                ShellArg::Fish => Shell::Fish,
                ShellArg::PowerShell => Shell::PowerShell,
            };

            let completions = completions::generate_completions(shell_enum)?;

            if let Some(output_path) = output {
                completions::save_completions(&completions, &output_path)?;
            } else {
                println!("{completions}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

impl CheckArgs {
    fn into_settings(self, config: &Config) -> check::CheckSettings {
        let parameters = if self.parameter_check_command.is_empty() {
            config.check_parameters.clone()
        } else {
            self.parameter_check_command
        };

        check::CheckSettings {
            shebang: self.shebang.unwrap_or_else(|| config.shebang.clone()),
            check_command: self
                .check_command
                .unwrap_or_else(|| config.check_command.clone()),
            parameters,
            timeout: self
                .timeout
                .map(std::time::Duration::from_secs)
                .or_else(|| config.timeout()),
            quiet: self.quiet,
            verbose: self.verbose,
            format: match self.format {
                ReportFormatArg::Text => check::ReportFormat::Text,
                ReportFormatArg::Json => check::ReportFormat::Json,
            },
        }
    }
}
