//! Utility functions and constants for RESP protocol.

use crate::error::ProtocolError;

/// CRLF line ending
pub const CRLF: &[u8] = b"\r\n";

/// Type markers
pub const SIMPLE_STRING: u8 = b'+';
pub const ERROR: u8 = b'-';
pub const INTEGER: u8 = b':';
pub const BULK_STRING: u8 = b'$';
pub const ARRAY: u8 = b'*';

/// Length announced by `$-1` and `*-1`.
pub const NULL_LENGTH: i64 = -1;

/// Null bulk string: `$-1\r\n`
pub const NULL_BULK_STRING: &[u8] = b"$-1\r\n";

/// Parse an integer from a byte slice
#[inline]
pub fn parse_integer(buf: &[u8]) -> Result<i64, ProtocolError> {
	let s = std::str::from_utf8(buf)
		.map_err(|e| ProtocolError::InvalidInteger(e.to_string()))?;
	s.parse::<i64>()
		.map_err(|e| ProtocolError::InvalidInteger(format!("{s:?}: {e}")))
}

/// Parse the length header of a bulk string or an array.
///
/// Returns `None` for the null length (`-1`).
#[inline]
pub fn parse_length(buf: &[u8]) -> Result<Option<usize>, ProtocolError> {
	let length = parse_integer(buf)?;
	if length == NULL_LENGTH {
		return Ok(None);
	}
	usize::try_from(length)
		.map(Some)
		.map_err(|_| ProtocolError::InvalidLength(length))
}
