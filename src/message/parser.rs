//! Event parser for optimize stream lines

use crate::error::{OptimizerError, Result};
use crate::types::events::StreamEvent;

/// Parse one stream line into a typed event
///
/// # Arguments
/// * `line` - A single line of the response body, without its terminator
///
/// # Returns
/// Parsed event or error
///
/// # Errors
/// Returns `OptimizerError::Protocol` if the line is not JSON or does not
/// match any event shape. Callers drop such lines and keep consuming.
pub fn parse_event(line: &str) -> Result<StreamEvent> {
    let trimmed = line.trim();
    serde_json::from_str(trimmed).map_err(|e| {
        OptimizerError::protocol(format!("Failed to parse event: {e}"), trimmed)
    })
}
