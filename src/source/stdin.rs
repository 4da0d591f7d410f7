//! Stdin-based log source for piped input.

use crate::model::error::InputError;
use std::io::{IsTerminal, Read};

/// Read a whole log from piped stdin.
///
/// # Errors
///
/// Returns `InputError::NoInput` if stdin is a TTY, so we never block
/// waiting on an interactive terminal.
pub fn read_stdin() -> Result<String, InputError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(InputError::NoInput);
    }
    read_all(stdin.lock())
}

/// Read everything from `reader` as UTF-8.
fn read_all(mut reader: impl Read) -> Result<String, InputError> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    Ok(buffer)
}
