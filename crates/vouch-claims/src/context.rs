//! # Context Field Extraction
//!
//! The claim context is a caller-defined string, usually JSON, that is
//! never schema-validated. This is a substring scan, not a JSON parser:
//!
//! 1. The key is either a full pattern such as `"contextMessage":"` (used
//!    verbatim) or a bare name such as `contextMessage` (wrapped into
//!    `"contextMessage":"`).
//! 2. The first occurrence of the pattern is located.
//! 3. The value runs up to the next `"` that is not escaped, where a quote
//!    is escaped when preceded by an odd number of backslashes.
//! 4. The value is returned verbatim; escape sequences are not decoded.
//!
//! A missing key, an empty key, or a value with no closing quote yields
//! `None`. Only string-valued fields can be extracted; numbers, objects,
//! and a pattern occurring inside another value are out of reach.

/// Value of the string field `key` in `context`, see the module docs.
pub fn extract_field_from_context<'a>(context: &'a str, key: &str) -> Option<&'a str> {
    if key.is_empty() {
        return None;
    }
    let pattern = if key.starts_with('"') {
        key.to_string()
    } else {
        format!("\"{key}\":\"")
    };

    let start = context.find(&pattern)? + pattern.len();
    let rest = &context[start..];

    let mut backslashes = 0usize;
    for (i, b) in rest.bytes().enumerate() {
        match b {
            b'\\' => backslashes += 1,
            b'"' if backslashes % 2 == 0 => return Some(&rest[..i]),
            _ => backslashes = 0,
        }
    }
    None
}
