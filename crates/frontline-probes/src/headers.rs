// crates/frontline-probes/src/headers.rs
// ============================================================================
// Module: Raw Response Head Parsing
// Description: Bounded reader and parser for raw HTTP/1.x response heads.
// Purpose: Extract status and headers from untrusted byte streams.
// Dependencies: frontline-core, tokio
// ============================================================================

//! ## Overview
//! The HTTP/1.0 probe speaks HTTP over a raw TLS stream, so the response head
//! is read and parsed here. Reads stop at the blank line ending the head or at
//! the configured byte limit, whichever comes first; the body is never read.
//! Invariants:
//! - Header names are stored in canonical MIME form.
//! - Repeated headers are joined with `", "` in arrival order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io::ErrorKind;

pub use frontline_core::canonical_header_name;
use frontline_core::ProbeError;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Parsed status line and headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    /// Protocol token from the status line, such as `HTTP/1.0`.
    pub version: String,
    /// Status code.
    pub status: u16,
    /// Headers keyed by canonical name.
    pub headers: BTreeMap<String, String>,
}

// ============================================================================
// SECTION: Reading
// ============================================================================

/// Reads bytes until the end of the response head.
///
/// A peer that closes without a TLS close notification is treated as end of
/// stream.
///
/// # Errors
///
/// Returns [`ProbeError::Protocol`] when the head exceeds `limit` or the
/// stream ends first, and [`ProbeError::Http`] on I/O failure.
pub async fn read_response_head<R>(reader: &mut R, limit: usize) -> Result<Vec<u8>, ProbeError>
where
    R: AsyncRead + Unpin,
{
    let mut head = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = head_end(&head) {
            if end > limit {
                return Err(ProbeError::Protocol(format!("response head exceeds {limit} bytes")));
            }
            head.truncate(end);
            return Ok(head);
        }
        if head.len() >= limit {
            return Err(ProbeError::Protocol(format!("response head exceeds {limit} bytes")));
        }
        let read = match reader.read(&mut chunk).await {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => 0,
            Err(err) => return Err(ProbeError::Http(err.to_string())),
        };
        if read == 0 {
            return Err(ProbeError::Protocol("connection closed before end of headers".to_string()));
        }
        head.extend_from_slice(&chunk[.. read]);
    }
}

/// Returns the length of the head including its terminating blank line.
fn head_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|window| window == b"\r\n\r\n").map(|pos| pos + 4).or_else(|| {
        bytes.windows(2).position(|window| window == b"\n\n").map(|pos| pos + 2)
    })
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a raw response head.
///
/// Accepts CRLF or bare LF line endings and folds obsolete continuation lines
/// into the preceding header value.
///
/// # Errors
///
/// Returns [`ProbeError::Protocol`] when the status line or a header line is
/// malformed.
pub fn parse_response_head(raw: &[u8]) -> Result<ResponseHead, ProbeError> {
    let text = String::from_utf8_lossy(raw);
    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));
    let status_line =
        lines.next().ok_or_else(|| ProbeError::Protocol("empty response".to_string()))?;
    let (version, status) = parse_status_line(status_line)?;

    let mut entries: Vec<(String, String)> = Vec::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if line.starts_with([' ', '\t']) {
            let Some((_, value)) = entries.last_mut() else {
                return Err(ProbeError::Protocol("continuation before first header".to_string()));
            };
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(line.trim());
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(ProbeError::Protocol(format!("malformed header line: {line}")));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(ProbeError::Protocol("empty header name".to_string()));
        }
        entries.push((canonical_header_name(name), value.trim().to_string()));
    }

    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in entries {
        if let Some(existing) = headers.get_mut(&name) {
            existing.push_str(", ");
            existing.push_str(&value);
        } else {
            headers.insert(name, value);
        }
    }
    Ok(ResponseHead {
        version,
        status,
        headers,
    })
}

/// Parses `HTTP/x.y NNN reason`.
fn parse_status_line(line: &str) -> Result<(String, u16), ProbeError> {
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(ProbeError::Protocol(format!("malformed status line: {line}")));
    }
    let status = parts
        .next()
        .filter(|code| code.len() == 3)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| ProbeError::Protocol(format!("malformed status code: {line}")))?;
    Ok((version.to_string(), status))
}
