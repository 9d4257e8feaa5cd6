//! Status command polling and output parsing for the ollamaps tray.
//!
//! The tray periodically runs `ollama ps` and turns its tabular output into
//! one human-readable summary line per loaded model.
//!
//! # Operations
//!
//! - **Poll**: run the status command through the platform shell, with a
//!   timeout, and return its trimmed stdout. Failures are encoded in-band as
//!   an `"Error: ..."` string.
//! - **Parse**: split the captured text into summary lines using a
//!   [`ColumnMap`]; rows that do not fit the layout pass through verbatim.

pub mod error;
pub mod parser;
pub mod poller;

pub use error::PollError;
pub use parser::{ColumnMap, parse, parse_with};
pub use poller::{DEFAULT_COMMAND, DEFAULT_TIMEOUT, ERROR_MARKER, Poller};
