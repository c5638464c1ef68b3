//! Response-body extraction via a restricted path grammar.
//!
//! Extraction pulls a value out of a decoded JSON response and binds it
//! into the variable environment. The grammar is deliberately small and
//! closed, not a JSONPath implementation:
//!
//! - `$` or `$.` addresses the whole document
//! - otherwise, a leading `$.` is stripped and the remainder splits on `.`
//! - each segment is a field name (`user`) or a field name with one
//!   zero-based index (`items[0]`)
//!
//! Anything else - wildcards, filters, nested indices, quoted keys - is
//! outside the grammar and fails as unresolvable. Traversal is strictly
//! left-to-right and the first segment that cannot be resolved fails the
//! whole extraction; there are no partial results.

use super::environment::{VarValue, VariableEnvironment};
use crate::models::ExtractRule;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Matches an indexed segment: `name[index]`, one level only.
static INDEXED_SEGMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\[\]]+)\[(\d+)\]$").expect("Failed to compile indexed segment regex")
});

/// Errors produced by response extraction.
///
/// Both abort the extraction with the target variable left unmodified;
/// neither is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Response body is not valid JSON.
    Parse(String),

    /// Path expression could not be resolved against the document.
    NotFound(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Parse(msg) => write!(f, "Response body is not valid JSON: {}", msg),
            ExtractError::NotFound(path) => write!(f, "Path not found: {}", path),
        }
    }
}

impl std::error::Error for ExtractError {}

/// A parsed path segment: field lookup, optionally followed by one array
/// index.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathSegment<'a> {
    field: &'a str,
    index: Option<usize>,
}

/// Splits a path remainder (leading `$.` already stripped) into segments.
///
/// Returns `None` if any piece falls outside the grammar, which callers
/// report as NotFound: a path the grammar cannot express can never resolve.
fn parse_segments(path: &str) -> Option<Vec<PathSegment<'_>>> {
    let mut segments = Vec::new();

    for raw in path.split('.') {
        if raw.is_empty() {
            return None;
        }

        if let Some(caps) = INDEXED_SEGMENT_REGEX.captures(raw) {
            let field = caps.get(1)?.as_str();
            let index = caps.get(2)?.as_str().parse::<usize>().ok()?;
            segments.push(PathSegment {
                field,
                index: Some(index),
            });
        } else if raw.contains('[') || raw.contains(']') {
            // Bracket present but not a well-formed single index.
            return None;
        } else {
            segments.push(PathSegment {
                field: raw,
                index: None,
            });
        }
    }

    Some(segments)
}

/// Walks `root` along `path` and returns the addressed sub-value.
///
/// # Arguments
///
/// * `root` - The decoded JSON document
/// * `path` - Path expression (`$`, `$.field`, `$.field[0].sub`, ...)
///
/// # Returns
///
/// The addressed value, or `ExtractError::NotFound` if any segment is a
/// missing key, an out-of-bounds index, or traverses a non-container.
pub fn extract_path<'a>(root: &'a JsonValue, path: &str) -> Result<&'a JsonValue, ExtractError> {
    let trimmed = path.trim();

    // Whole-document reference.
    if trimmed == "$" || trimmed == "$." {
        return Ok(root);
    }

    let remainder = trimmed
        .strip_prefix("$.")
        .or_else(|| trimmed.strip_prefix('$'))
        .unwrap_or(trimmed);

    if remainder.is_empty() {
        return Ok(root);
    }

    let segments = parse_segments(remainder)
        .ok_or_else(|| ExtractError::NotFound(format!("malformed path segment in '{}'", path)))?;

    let mut current = root;
    for segment in segments {
        current = current.get(segment.field).ok_or_else(|| {
            ExtractError::NotFound(format!("field '{}' in '{}'", segment.field, path))
        })?;

        if let Some(index) = segment.index {
            current = current.get(index).ok_or_else(|| {
                ExtractError::NotFound(format!(
                    "index {} of '{}' in '{}'",
                    index, segment.field, path
                ))
            })?;
        }
    }

    Ok(current)
}

/// Extracts from a raw response body and binds the result.
///
/// Parses `body` as JSON, walks `rule.path`, and on success binds the
/// addressed value into `env` under `rule.variable`, overwriting any prior
/// binding. On any failure nothing is written.
///
/// # Returns
///
/// The value that was bound, or the extraction error.
pub fn capture(
    body: &str,
    rule: &ExtractRule,
    env: &mut VariableEnvironment,
) -> Result<VarValue, ExtractError> {
    let document: JsonValue =
        serde_json::from_str(body).map_err(|e| ExtractError::Parse(e.to_string()))?;

    let value = extract_path(&document, &rule.path)?;
    let bound = VarValue::from_json(value.clone());
    env.set(rule.variable.clone(), bound.clone());
    Ok(bound)
}
