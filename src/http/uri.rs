//! Request target decoding module
//!
//! Extracts the path of a request target and percent-decodes it.

use hyper::Uri;
use thiserror::Error;

/// Reasons a request path cannot be decoded
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed percent escape at byte {0}")]
    MalformedEscape(usize),
    #[error("decoded path is not valid UTF-8")]
    InvalidUtf8,
}

/// Characters whose escapes are left encoded, so `%2F` never becomes a separator
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Percent-decode the path component of `uri`; the query string is ignored.
///
/// Every `%` must be followed by two hex digits. Escapes of reserved
/// characters stay as their literal `%XX` text. The decoded bytes must form
/// valid UTF-8.
pub fn decode_path(uri: &Uri) -> Result<String, DecodeError> {
    let path = uri.path();
    check_escapes(path)?;

    let mut decoded = Vec::with_capacity(path.len());
    let mut run_start = 0;
    let mut pos = 0;
    while let Some(offset) = path[pos..].find('%') {
        let at = pos + offset;
        // check_escapes guarantees two ASCII hex digits follow
        let escape = &path[at..at + 3];
        if is_reserved_escape(escape) {
            let run = urlencoding::decode_binary(path[run_start..at].as_bytes());
            decoded.extend_from_slice(&run);
            decoded.extend_from_slice(escape.as_bytes());
            run_start = at + 3;
        }
        pos = at + 3;
    }
    decoded.extend_from_slice(&urlencoding::decode_binary(path[run_start..].as_bytes()));

    String::from_utf8(decoded).map_err(|_| DecodeError::InvalidUtf8)
}

fn is_reserved_escape(escape: &str) -> bool {
    u8::from_str_radix(&escape[1..], 16).is_ok_and(|byte| RESERVED.contains(&byte))
}

fn check_escapes(path: &str) -> Result<(), DecodeError> {
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(DecodeError::MalformedEscape(i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
