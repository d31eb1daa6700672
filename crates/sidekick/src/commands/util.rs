//! Shared helpers for command handlers.

use sidekick_core::Location;

use crate::error::CliError;

/// Parse a command-line URL into a browser-style location.
pub fn parse_location(url: &str) -> Result<Location, CliError> {
    url.parse().map_err(|e| CliError::Validation {
        field: "url".into(),
        reason: format!("'{url}' is not a valid URL: {e}"),
    })
}
