//! Best-effort parser for `ollama ps` tabular output.
//!
//! Each non-empty line is split on whitespace. Lines with enough tokens are
//! reformatted as `"<name> (Mem: <memory>, CPU: <cpu>)"` using the column
//! indices from [`ColumnMap`]; everything else (the header row, malformed
//! output) is passed through trimmed but otherwise unchanged.

use serde::{Deserialize, Serialize};

use crate::ERROR_MARKER;

/// Token indices used to pull fields out of a status row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Index of the model identifier.
    pub name: usize,
    /// Index of the memory figure.
    pub memory: usize,
    /// Index of the CPU figure.
    pub cpu: usize,
    /// Rows with fewer tokens are passed through verbatim.
    pub min_tokens: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: 0,
            memory: 2,
            cpu: 4,
            min_tokens: 4,
        }
    }
}

impl ColumnMap {
    /// Formats a single trimmed line.
    fn summarize(&self, line: &str) -> String {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < self.min_tokens {
            return line.to_string();
        }

        match (
            tokens.get(self.name),
            tokens.get(self.memory),
            tokens.get(self.cpu),
        ) {
            (Some(name), Some(memory), Some(cpu)) => {
                format!("{name} (Mem: {memory}, CPU: {cpu})")
            }
            // Enough tokens to qualify, but a mapped column is missing.
            _ => line.to_string(),
        }
    }
}

/// Parses status text with the default column layout.
pub fn parse(text: &str) -> Vec<String> {
    parse_with(text, &ColumnMap::default())
}

/// Parses status text into summary lines, one per non-empty line.
///
/// Returns an empty list when `text` carries the poller's error marker.
pub fn parse_with(text: &str, columns: &ColumnMap) -> Vec<String> {
    if text.starts_with(ERROR_MARKER) {
        return Vec::new();
    }

    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| columns.summarize(line))
        .collect()
}
