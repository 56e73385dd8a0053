//! Comma-separated input parsing
//!
//! Turns user text such as `"5, 1, 8, 4"` into the integer array a trace is
//! generated from. Callers keep their previous array when parsing fails, so
//! the trace generators only ever see well-formed input.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use thiserror::Error;

use crate::algorithm::state::Value;

/// Rejected input text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("'{token}' at position {position} is not an integer")]
    InvalidNumber { token: String, position: usize },

    #[error("empty value at position {0}")]
    EmptyValue(usize),
}

/// Parses comma-separated integers.
///
/// Surrounding whitespace is ignored, as is a single trailing comma. Blank
/// text parses to an empty array.
pub fn parse_values(text: &str) -> Result<Vec<Value>, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let body = trimmed.strip_suffix(',').unwrap_or(trimmed);

    body.split(',')
        .enumerate()
        .map(|(position, raw)| {
            let token = raw.trim();
            if token.is_empty() {
                return Err(InputError::EmptyValue(position));
            }
            token.parse::<Value>().map_err(|_| InputError::InvalidNumber {
                token: token.to_string(),
                position,
            })
        })
        .collect()
}

/// Formats values back into the comma-separated form accepted by
/// [`parse_values`]
pub fn format_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
