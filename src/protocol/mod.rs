//! Command text protocol.
//!
//! Parsing and formatting for the `<unit>: <KEYWORD> [args]` command lines
//! that appear in the game log and can be fed to the interpreter.

pub mod notation;

pub use notation::{format_command, parse_command, CommandError};
