//! Strict JSON decoding of raw model responses.
//!
//! The decoder accepts exactly one JSON document, optionally surrounded by
//! whitespace. Anything else fails with a [`ParseError`]: prose before the
//! document, trailing commentary after it, or truncated output. Prose-wrapped
//! JSON is never scanned for a plausible substring.
//!
//! # Example
//!
//! ```rust
//! use typedex_core::decoder::decode;
//!
//! let tree = decode(r#"{"addresses": []}"#).unwrap();
//! assert!(tree["addresses"].is_array());
//!
//! assert!(decode(r#"Sure! Here is the JSON: {"addresses": []}"#).is_err());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::trace;

use crate::errors::{ParseCategory, ParseError};

/// Default number of bytes shown on each side of a parse failure.
pub const DEFAULT_SNIPPET_RADIUS: usize = 24;

/// Options for [`decode_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Accept a response that consists solely of one markdown code fence
    /// (```` ```json ... ``` ````). Text outside the fence is still rejected.
    pub strip_code_fence: bool,
    /// Bytes of context captured on each side of a failure.
    pub snippet_radius: usize,
    /// Maximum nesting depth of the decoded tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strip_code_fence: false,
            snippet_radius: DEFAULT_SNIPPET_RADIUS,
            max_depth: None,
        }
    }
}

impl DecodeOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a response wrapped in a single markdown code fence.
    #[must_use]
    pub fn strip_code_fence(mut self, strip: bool) -> Self {
        self.strip_code_fence = strip;
        self
    }

    /// Set the snippet radius.
    #[must_use]
    pub fn snippet_radius(mut self, radius: usize) -> Self {
        self.snippet_radius = radius;
        self
    }

    /// Set the maximum nesting depth.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// Decode a raw response with default options.
pub fn decode(raw: &str) -> Result<JsonValue, ParseError> {
    decode_with(raw, &DecodeOptions::default())
}

/// Decode a raw response.
pub fn decode_with(raw: &str, options: &DecodeOptions) -> Result<JsonValue, ParseError> {
    let (start, end) = if options.strip_code_fence {
        code_fence_body(raw).unwrap_or((0, raw.len()))
    } else {
        (0, raw.len())
    };
    let body = &raw[start..end];

    let value: JsonValue = serde_json::from_str(body)
        .map_err(|e| from_serde_error(&e, raw, start, options.snippet_radius))?;

    if let Some(max) = options.max_depth {
        let depth = depth_of(&value);
        if depth > max {
            return Err(ParseError::new(
                ParseCategory::DepthExceeded,
                format!("document nests {depth} levels deep, limit is {max}"),
            ));
        }
    }

    trace!(bytes = raw.len(), kind = kind_name(&value), "Decoded response");
    Ok(value)
}

/// Name of the JSON kind of a value, as used in type mismatch diagnostics.
#[must_use]
pub fn kind_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => "integer",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Byte range of the body of a response made of exactly one code fence.
fn code_fence_body(raw: &str) -> Option<(usize, usize)> {
    let lead = raw.len() - raw.trim_start().len();
    let trimmed = raw.trim();
    let inner = trimmed.strip_prefix("```")?.strip_suffix("```")?;

    // The opening line may carry a language tag; only `json` is accepted.
    let newline = inner.find('\n')?;
    let tag = inner[..newline].trim();
    if !tag.is_empty() && !tag.eq_ignore_ascii_case("json") {
        return None;
    }

    let start = lead + 3 + newline + 1;
    let end = lead + 3 + inner.len();
    if start > end {
        return None;
    }
    Some((start, end))
}

fn from_serde_error(
    err: &serde_json::Error,
    raw: &str,
    body_start: usize,
    radius: usize,
) -> ParseError {
    let message = err.to_string();
    let category = if message.starts_with("trailing characters") {
        ParseCategory::TrailingContent
    } else if err.is_eof() {
        ParseCategory::Eof
    } else {
        ParseCategory::Syntax
    };

    // Strip serde_json's " at line X column Y" suffix; position is kept separately.
    let message = match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message,
    };

    let mut parse_error = ParseError::new(category, message);
    if err.line() == 0 {
        return parse_error;
    }

    let body = &raw[body_start..];
    let offset = body_start + byte_offset(body, err.line(), err.column());
    parse_error = parse_error.at(err.line(), err.column(), Some(offset));
    if !raw.is_empty() {
        parse_error = parse_error.with_snippet(snippet(raw, offset, radius));
    }
    parse_error
}

/// Convert serde_json's 1-based line and byte column into a byte offset.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

fn snippet(raw: &str, offset: usize, radius: usize) -> String {
    let mut start = offset.saturating_sub(radius);
    while !raw.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = offset.saturating_add(radius).min(raw.len());
    while !raw.is_char_boundary(end) {
        end += 1;
    }
    raw[start..end].to_string()
}

fn depth_of(value: &JsonValue) -> usize {
    match value {
        JsonValue::Array(items) => 1 + items.iter().map(depth_of).max().unwrap_or(0),
        JsonValue::Object(map) => 1 + map.values().map(depth_of).max().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_decode_object() {
        let value = decode(r#"{"addresses": [{"name": "A"}]}"#).unwrap();
        assert_eq!(value["addresses"][0]["name"], "A");
    }

    #[test]
    fn test_surrounding_whitespace_is_allowed() {
        let value = decode("\n\n  {\"a\": 1}  \n").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_prose_wrapped_json_is_rejected() {
        let err = decode(r#"Sure! Here is the JSON: {"addresses": []}"#).unwrap_err();
        assert_eq!(err.category, ParseCategory::Syntax);
        assert_eq!(err.offset, Some(0));
        assert!(err.snippet.as_deref().unwrap().starts_with("Sure!"));
    }

    #[test]
    fn test_trailing_content_is_rejected() {
        let err = decode(r#"{"addresses": []} Let me know if you need more!"#).unwrap_err();
        assert_eq!(err.category, ParseCategory::TrailingContent);
        assert_eq!(err.line, 1);
        assert_eq!(err.offset, Some(18));
        assert!(!err.message.contains("at line"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(r#"{"addresses": ["#)]
    fn test_incomplete_input_is_eof(#[case] raw: &str) {
        let err = decode(raw).unwrap_err();
        assert_eq!(err.category, ParseCategory::Eof);
    }

    #[test]
    fn test_offset_on_later_line() {
        let raw = "{\n  \"a\": 1,\n  \"b\": oops\n}";
        let err = decode(raw).unwrap_err();
        assert_eq!(err.line, 3);
        let offset = err.offset.unwrap();
        assert_eq!(&raw[offset..offset + 1], "o");
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let raw = "ééééééééé {";
        let err = decode_with(raw, &DecodeOptions::new().snippet_radius(3)).unwrap_err();
        assert!(err.snippet.is_some());
    }

    #[test]
    fn test_code_fence_rejected_by_default() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert!(decode(raw).is_err());
    }

    #[test]
    fn test_code_fence_opt_in() {
        let options = DecodeOptions::new().strip_code_fence(true);
        let value = decode_with("  ```json\n{\"a\": 1}\n```\n", &options).unwrap();
        assert_eq!(value["a"], 1);

        let value = decode_with("```\n[1, 2]\n```", &options).unwrap();
        assert_eq!(value[1], 2);
    }

    #[test]
    fn test_code_fence_with_prose_still_rejected() {
        let options = DecodeOptions::new().strip_code_fence(true);
        let raw = "Here you go:\n```json\n{\"a\": 1}\n```";
        assert!(decode_with(raw, &options).is_err());
    }

    #[test]
    fn test_code_fence_error_offset_is_relative_to_raw() {
        let options = DecodeOptions::new().strip_code_fence(true);
        let raw = "```json\n{\"a\": x}\n```";
        let err = decode_with(raw, &options).unwrap_err();
        let offset = err.offset.unwrap();
        assert_eq!(&raw[offset..offset + 1], "x");
    }

    #[test]
    fn test_max_depth() {
        let options = DecodeOptions::new().max_depth(2);
        assert!(decode_with(r#"{"a": [1]}"#, &options).is_ok());
        let err = decode_with(r#"{"a": [[1]]}"#, &options).unwrap_err();
        assert_eq!(err.category, ParseCategory::DepthExceeded);
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(kind_name(&serde_json::json!(1)), "integer");
        assert_eq!(kind_name(&serde_json::json!(1.5)), "number");
        assert_eq!(kind_name(&serde_json::json!("x")), "string");
        assert_eq!(kind_name(&serde_json::json!(null)), "null");
        assert_eq!(kind_name(&serde_json::json!({})), "object");
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: DecodeOptions = serde_json::from_str(r#"{"strip_code_fence": true}"#).unwrap();
        assert!(options.strip_code_fence);
        assert_eq!(options.snippet_radius, DEFAULT_SNIPPET_RADIUS);
        assert_eq!(options.max_depth, None);
    }
}
