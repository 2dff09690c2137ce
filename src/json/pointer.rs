//! RFC-6901 JSON Pointer subset.
//!
//! Supported escapes: `~1 → /` and `~0 → ~`. The empty pointer (or a bare
//! `/`, which addresses the "" key at root in strict RFC terms but is treated
//! as root here) addresses the whole document. Segments always address object
//! keys; this subset never indexes arrays.

use serde_json::Value;

use crate::types::errors::{Error, ErrorKind, Result};

/// Decode a pointer into its reference tokens. An empty string or `/` yields
/// no tokens (document root).
pub fn decode_pointer(pointer: &str) -> Result<Vec<String>> {
    if pointer.is_empty() || pointer == "/" {
        return Ok(Vec::new());
    }
    let rest = pointer.strip_prefix('/').ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidPointer,
            format!("pointer must start with '/': {pointer}"),
        )
    })?;
    rest.split('/').map(unescape_token).collect()
}

/// Encode reference tokens back into a pointer. Inverse of
/// [`decode_pointer`] on valid pointers; no tokens encode to "".
pub fn encode_pointer(tokens: &[String]) -> String {
    if tokens.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for t in tokens {
        out.push('/');
        out.push_str(&escape_token(t));
    }
    out
}

fn unescape_token(token: &str) -> Result<String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidPointer,
                    format!("invalid escape in pointer token: {token}"),
                ))
            }
        }
    }
    Ok(out)
}

fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Look up the value addressed by `tokens`, if any.
pub fn lookup<'a>(doc: &'a Value, tokens: &[String]) -> Option<&'a Value> {
    let mut cursor = doc;
    for t in tokens {
        cursor = cursor.as_object()?.get(t)?;
    }
    Some(cursor)
}
