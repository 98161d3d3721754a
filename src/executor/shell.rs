//! Checker invocation
//!
//! The checker is a plain shell command string. For each script it is run as
//!
//! ```text
//! sh -c '<checker> <parameters...> <script path>'
//! ```
//!
//! with the script workspace as working directory. Empty parameters are
//! dropped, the script path is shell-quoted. Output is captured, never
//! streamed, and a non-zero exit code is returned to the caller rather than
//! turned into an error.
//!
//! With a timeout set, the shell runs in its own process group on unix. When
//! the timeout fires the whole group is killed, so processes started by the
//! checker cannot keep the run waiting on their output pipes. Without a
//! timeout the checker stays in the caller's group and receives Ctrl-C.

use super::errors::CheckError;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

/// Exit code recorded when a checker is killed after its timeout.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long output is still collected once the deadline has passed.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Builder for checker invocations
#[derive(Debug, Clone)]
pub struct CheckCommand {
    command: String,
    parameters: Vec<String>,
    shell: String,
    timeout: Option<Duration>,
}

impl CheckCommand {
    /// Creates a checker invocation for `command` (e.g. `shellcheck`)
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            parameters: Vec::new(),
            shell: "sh".to_string(),
            timeout: None,
        }
    }

    /// Adds extra parameters placed between the command and the script path
    #[must_use]
    pub fn parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.extend(parameters.into_iter().map(Into::into));
        self
    }

    /// Kills the checker if it runs longer than `timeout`
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full command line used to check `script`
    #[must_use]
    pub fn command_line(&self, script: &Path) -> String {
        let mut parts = vec![self.command.trim().to_string()];
        parts.extend(
            self.parameters
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        );
        parts.push(shell_words::quote(&script.to_string_lossy()).into_owned());
        parts.join(" ")
    }

    /// Runs the checker against `script` from `cwd`
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Spawn`] if the shell cannot be started or waited
    /// on. A checker exiting non-zero is reported through
    /// [`CheckOutput::exit_code`].
    pub fn run(&self, script: &Path, cwd: &Path) -> Result<CheckOutput, CheckError> {
        let command = self.command_line(script);
        let spawn_error = |e: std::io::Error| CheckError::Spawn {
            command: command.clone(),
            message: e.to_string(),
        };

        tracing::debug!(command = %command, cwd = %cwd.display(), "Executing checker");

        let start = Instant::now();
        let mut shell = Command::new(&self.shell);
        shell
            .arg("-c")
            .arg(&command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        if self.timeout.is_some() {
            use std::os::unix::process::CommandExt;
            shell.process_group(0);
        }
        let mut child = shell.spawn().map_err(spawn_error)?;

        let stdout = capture(child.stdout.take());
        let stderr = capture(child.stderr.take());

        let deadline = self.timeout.map(|timeout| start + timeout);
        let (status, timed_out) = match deadline {
            Some(deadline) => wait_with_deadline(&mut child, deadline).map_err(spawn_error)?,
            None => (child.wait().map_err(spawn_error)?, false),
        };

        let exit_code = if timed_out {
            tracing::warn!(command = %command, "Checker timed out and was killed");
            TIMEOUT_EXIT_CODE
        } else {
            exit_code(status)
        };

        let output = CheckOutput {
            command,
            stdout: drain(&stdout, deadline),
            stderr: drain(&stderr, deadline),
            exit_code,
            timed_out,
            duration: start.elapsed(),
        };
        tracing::debug!(
            command = %output.command,
            exit_code = output.exit_code,
            duration = ?output.duration,
            "Checker finished"
        );
        Ok(output)
    }
}

/// Captured result of one checker invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutput {
    /// Command line that was executed.
    pub command: String,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit code (`128 + signal` if killed by a signal, 124 on timeout)
    pub exit_code: i32,
    /// Whether the checker was killed after its timeout.
    pub timed_out: bool,
    /// Duration of execution
    pub duration: Duration,
}

impl CheckOutput {
    /// Returns true if the checker exited with code 0
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

fn capture<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
    }
    rx
}

/// Collects the output of a reader thread.
///
/// Without a deadline this waits until the pipe closes. With one, output
/// still pending after the deadline plus [`DRAIN_GRACE`] is dropped and
/// the reader thread is left to finish on its own.
fn drain(rx: &Receiver<Vec<u8>>, deadline: Option<Instant>) -> String {
    let buf = match deadline {
        None => rx.recv().ok(),
        Some(deadline) => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            rx.recv_timeout(remaining.max(DRAIN_GRACE)).ok()
        }
    };
    buf.map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}

fn wait_with_deadline(child: &mut Child, deadline: Instant) -> io::Result<(ExitStatus, bool)> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status, false));
        }
        if Instant::now() >= deadline {
            kill_process_group(child)?;
            return Ok((child.wait()?, true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(unix)]
fn kill_process_group(child: &mut Child) -> io::Result<()> {
    let pgid = libc::pid_t::try_from(child.id()).map_err(io::Error::other)?;
    // SAFETY: killpg only sends a signal; the group was created at spawn
    // with the child as leader and the child has not been reaped yet.
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        Ok(())
    } else {
        Err(err)
    }
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) -> io::Result<()> {
    child.kill()
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
