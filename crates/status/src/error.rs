//! Error types for status command invocation.

use std::time::Duration;

/// Errors produced while running the status command.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("failed to launch status command: {0}")]
    Spawn(std::io::Error),

    #[error("status command exited with code {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },

    #[error("status command timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
