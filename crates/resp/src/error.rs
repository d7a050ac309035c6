//! Error types for RESP decoding.

use bytes::Bytes;
use thiserror::Error;

use crate::types::ErrorValue;

/// Main error type for a failed `read_response` call.
///
/// Every variant aborts the reply being decoded. Server errors that are not
/// connection-fatal never show up here: they are returned as
/// [`ReplyValue::Error`](crate::ReplyValue::Error).
#[derive(Error, Debug)]
pub enum RespError {
	/// The chunk source ran dry before a complete reply was read
	#[error("Connection closed by server")]
	ConnectionClosed,

	/// Malformed framing
	#[error(transparent)]
	Protocol(#[from] ProtocolError),

	/// The bulk payload does not have the announced length
	#[error("Data integrity error: expected {expected} bytes, got {actual}")]
	DataIntegrity { expected: usize, actual: usize },

	/// Payload bytes are invalid for the configured text encoding
	#[error("Decoding error: {0}")]
	Decoding(String),

	/// Server error reply classified as connection-fatal
	#[error("Server error: {0}")]
	Server(ErrorValue),

	/// The chunk source itself failed
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl RespError {
	/// Whether the connection this error came from should be dropped.
	pub fn is_connection_error(&self) -> bool {
		match self {
			RespError::ConnectionClosed | RespError::Io(_) => true,
			RespError::Server(e) => e.kind().is_connection_fatal(),
			_ => false,
		}
	}
}

/// Framing violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
	/// The chunk does not start with a known type marker
	#[error("Protocol Error: {raw:?}")]
	InvalidTypeMarker { raw: Bytes },

	/// Invalid integer value, length or count
	#[error("Invalid integer: {0}")]
	InvalidInteger(String),

	/// Negative length other than the null length
	#[error("Invalid length: {0}")]
	InvalidLength(i64),

	/// Arrays nested deeper than the decoder allows
	#[error("Nesting depth exceeds limit of {0}")]
	NestingTooDeep(usize),
}
