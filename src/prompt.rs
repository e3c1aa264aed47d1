//! Interactive fill-in for fields not given on the command line.

use dialoguer::Input;

use crate::error::{Error, Result};

/// Asks for a single field value; an empty answer is accepted.
pub fn ask(label: &str) -> Result<String> {
    Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| Error::ConfigError(e.to_string()))
}

/// Returns the command-line value if present, otherwise asks for it.
/// In batch mode missing fields stay empty.
pub fn field_or_ask(value: Option<String>, label: &str, batch: bool) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None if batch => Ok(String::new()),
        None => ask(label),
    }
}
