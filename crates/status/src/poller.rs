//! Runs the status command through the platform shell.

use std::process::Stdio;
use std::time::Duration;

use crate::PollError;

/// Command line handed to the shell on every poll.
pub const DEFAULT_COMMAND: &str = "ollama ps";

/// Upper bound on a single status command run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Prefix of every in-band error string returned by [`Poller::poll`].
pub const ERROR_MARKER: &str = "Error:";

/// Invokes the status command and captures its output.
#[derive(Debug, Clone)]
pub struct Poller {
    command: String,
    timeout: Duration,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND, DEFAULT_TIMEOUT)
    }
}

impl Poller {
    /// Creates a poller for `command` bounded by `timeout`.
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    /// Returns the shell command line this poller runs.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Runs the command and returns trimmed stdout, or an `"Error: ..."`
    /// string when the invocation fails. Never returns a fault.
    pub async fn poll(&self) -> String {
        match self.try_poll().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(command = %self.command, "status poll failed: {e}");
                format!("{ERROR_MARKER} {e}")
            }
        }
    }

    /// Runs the command and returns trimmed stdout.
    ///
    /// A non-zero exit status is an error even when stdout is non-empty.
    pub async fn try_poll(&self) -> Result<String, PollError> {
        let child = shell_command(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(PollError::Spawn)?;

        // Dropping the wait future on timeout kills the child.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| PollError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(PollError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> tokio::process::Command {
    /// Keeps `cmd.exe` from flashing a console window on every poll.
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;

    let mut cmd = tokio::process::Command::new("cmd");
    cmd.args(["/C", command]).creation_flags(CREATE_NO_WINDOW);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}
