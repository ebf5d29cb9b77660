//! Metadata normalization.
//!
//! Builder metadata arrives either already decoded (a tree) or as serialized
//! text: JSON, a JSON string wrapping JSON, or PHP-serialized data. `as_tree`
//! turns all of them into one `serde_json::Value` so traversal code never
//! has to care which encoding it came from.

pub mod php;

use std::borrow::Cow;

use formscan_core::errors::ParseError;
use formscan_core::types::FormId;
use serde::Deserialize;
use serde_json::Value;

use crate::patterns::parse_id;
use php::PhpErrorKind;

/// Extra nesting text may carry beyond the walk ceiling: widget settings
/// hang below the deepest node the walker still visits.
pub const SETTINGS_HEADROOM: usize = 32;

/// Nesting accepted when decoding text for a walk bounded by `max_depth`.
pub fn decode_ceiling(max_depth: usize) -> usize {
    max_depth.saturating_add(SETTINGS_HEADROOM)
}

/// Normalize an opaque metadata value into a tree.
///
/// Non-string values pass through untouched. Empty text decodes to `Null`.
pub fn as_tree<'v>(key: &str, value: &'v Value, max_depth: usize) -> Result<Cow<'v, Value>, ParseError> {
    match value {
        Value::String(text) => decode_text(key, text, max_depth).map(Cow::Owned),
        other => Ok(Cow::Borrowed(other)),
    }
}

/// Decode serialized metadata text.
pub fn decode_text(key: &str, text: &str, max_depth: usize) -> Result<Value, ParseError> {
    decode(key, text, max_depth, true)
}

fn decode(key: &str, text: &str, max_depth: usize, unwrap_string: bool) -> Result<Value, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return decode_json(key, trimmed, decode_ceiling(max_depth));
    }

    // Some stores double-encode: a JSON string whose content is the JSON document.
    if unwrap_string && trimmed.starts_with('"') {
        let inner: String =
            serde_json::from_str(trimmed).map_err(|e| ParseError::InvalidJson {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        return decode(key, &inner, max_depth, false);
    }

    if php::looks_serialized(trimmed) {
        let ceiling = decode_ceiling(max_depth);
        return php::unserialize(trimmed, ceiling).map_err(|e| match e.kind {
            PhpErrorKind::Depth => ParseError::DepthExceeded {
                key: key.to_string(),
                limit: ceiling,
            },
            PhpErrorKind::Syntax(message) => ParseError::InvalidSerialized {
                key: key.to_string(),
                offset: e.offset,
                message,
            },
        });
    }

    Err(ParseError::UnrecognizedEncoding {
        key: key.to_string(),
    })
}

/// JSON decoding bounded by our own ceiling instead of serde_json's fixed
/// recursion limit, so text and pre-decoded trees nest equally deep.
fn decode_json(key: &str, text: &str, ceiling: usize) -> Result<Value, ParseError> {
    if json_nesting(text) > ceiling {
        return Err(ParseError::DepthExceeded {
            key: key.to_string(),
            limit: ceiling,
        });
    }

    let invalid = |e: serde_json::Error| ParseError::InvalidJson {
        key: key.to_string(),
        message: e.to_string(),
    };
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de).map_err(invalid)?;
    de.end().map_err(invalid)?;
    Ok(value)
}

/// Deepest container in JSON text, counted like the walker counts (root is 0).
/// Brackets inside strings are ignored.
fn json_nesting(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest.saturating_sub(1)
}

/// Interpret a settings value as a form id: a non-negative integer or a
/// digit string. Anything else (including `""` and `"0abc"`) is no id.
pub fn value_as_form_id(value: &Value) -> Option<FormId> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                parse_id(s)
            } else {
                None
            }
        }
        _ => None,
    }
}
