//! RESP data types and value representation.

use std::fmt;

use bytes::Bytes;

use crate::classify::ServerErrorKind;

/// Body of a simple or bulk string reply.
///
/// Decoders without a text encoding hand out `Raw` bytes; with an encoding
/// configured the transcoded `Text` replaces them. Equality compares the
/// underlying bytes, so `Raw(b"OK")` equals `Text("OK")`.
#[derive(Debug, Clone)]
pub enum Payload {
	Raw(Bytes),
	Text(String),
}

impl Payload {
	pub fn as_bytes(&self) -> &[u8] {
		match self {
			Payload::Raw(b) => b,
			Payload::Text(s) => s.as_bytes(),
		}
	}

	/// Text view; raw payloads are checked for UTF-8.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Payload::Raw(b) => std::str::from_utf8(b).ok(),
			Payload::Text(s) => Some(s),
		}
	}

	pub fn len(&self) -> usize {
		self.as_bytes().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn is_text(&self) -> bool {
		matches!(self, Payload::Text(_))
	}

	pub fn into_bytes(self) -> Bytes {
		match self {
			Payload::Raw(b) => b,
			Payload::Text(s) => Bytes::from(s),
		}
	}
}

impl PartialEq for Payload {
	fn eq(&self, other: &Self) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}

impl Eq for Payload {}

impl From<Bytes> for Payload {
	fn from(b: Bytes) -> Self {
		Payload::Raw(b)
	}
}

impl From<&[u8]> for Payload {
	fn from(b: &[u8]) -> Self {
		Payload::Raw(Bytes::copy_from_slice(b))
	}
}

impl From<Vec<u8>> for Payload {
	fn from(v: Vec<u8>) -> Self {
		Payload::Raw(Bytes::from(v))
	}
}

impl From<&str> for Payload {
	fn from(s: &str) -> Self {
		Payload::Text(s.to_string())
	}
}

impl From<String> for Payload {
	fn from(s: String) -> Self {
		Payload::Text(s)
	}
}

/// A server error reply, split into its code token and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
	code: String,
	message: String,
	kind: ServerErrorKind,
}

impl ErrorValue {
	pub fn new(code: impl Into<String>, message: impl Into<String>, kind: ServerErrorKind) -> Self {
		Self {
			code: code.into(),
			message: message.into(),
			kind,
		}
	}

	/// Leading token of the error line, e.g. `ERR` or `WRONGTYPE`.
	pub fn code(&self) -> &str {
		&self.code
	}

	/// Everything after the first space.
	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn kind(&self) -> ServerErrorKind {
		self.kind
	}

	/// The error line as the server sent it, without the `-` marker.
	pub fn full_text(&self) -> String {
		if self.message.is_empty() {
			self.code.clone()
		} else {
			format!("{} {}", self.code, self.message)
		}
	}
}

impl fmt::Display for ErrorValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.kind.name(), self.full_text())
	}
}

impl std::error::Error for ErrorValue {}

/// Represents one decoded RESP2 reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyValue {
	/// Simple string: `+OK\r\n`
	SimpleString(Payload),

	/// Integer: `:1000\r\n`
	Integer(i64),

	/// Bulk string: `$6\r\nfoobar\r\n`, `None` for `$-1\r\n`
	BulkString(Option<Payload>),

	/// Array: `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`, `None` for `*-1\r\n`
	Array(Option<Vec<ReplyValue>>),

	/// Error: `-ERR message\r\n`
	Error(ErrorValue),
}

impl ReplyValue {
	/// Check if the value is an error
	pub fn is_error(&self) -> bool {
		matches!(self, ReplyValue::Error(_))
	}

	/// Check if the value is a null bulk string or a null array
	pub fn is_null(&self) -> bool {
		matches!(self, ReplyValue::BulkString(None) | ReplyValue::Array(None))
	}

	/// Try to convert to a string slice
	pub fn as_str(&self) -> Option<&str> {
		match self {
			ReplyValue::SimpleString(p) | ReplyValue::BulkString(Some(p)) => p.as_str(),
			_ => None,
		}
	}

	/// Try to convert to bytes
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			ReplyValue::SimpleString(p) | ReplyValue::BulkString(Some(p)) => Some(p.as_bytes()),
			_ => None,
		}
	}

	/// Try to convert to integer
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			ReplyValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	/// Try to convert to array
	pub fn as_array(&self) -> Option<&[ReplyValue]> {
		match self {
			ReplyValue::Array(Some(a)) => Some(a),
			_ => None,
		}
	}

	pub fn as_error(&self) -> Option<&ErrorValue> {
		match self {
			ReplyValue::Error(e) => Some(e),
			_ => None,
		}
	}

	/// Try to consume and convert to Vec<ReplyValue>
	pub fn into_vec(self) -> Option<Vec<ReplyValue>> {
		match self {
			ReplyValue::Array(a) => a,
			_ => None,
		}
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			ReplyValue::SimpleString(_) => "simple string",
			ReplyValue::Integer(_) => "integer",
			ReplyValue::BulkString(_) => "bulk string",
			ReplyValue::Array(_) => "array",
			ReplyValue::Error(_) => "error",
		}
	}

	// Convenience constructors

	pub fn simple_string(s: impl Into<Payload>) -> Self {
		ReplyValue::SimpleString(s.into())
	}

	pub fn bulk_string(s: impl Into<Payload>) -> Self {
		ReplyValue::BulkString(Some(s.into()))
	}

	pub fn integer(i: i64) -> Self {
		ReplyValue::Integer(i)
	}

	pub fn array(items: impl IntoIterator<Item = ReplyValue>) -> Self {
		ReplyValue::Array(Some(items.into_iter().collect()))
	}

	pub fn null_bulk() -> Self {
		ReplyValue::BulkString(None)
	}

	pub fn null_array() -> Self {
		ReplyValue::Array(None)
	}
}

/// Input of [`Encoder::encode`](crate::Encoder::encode).
#[derive(Debug, Clone, PartialEq)]
pub enum EncodableValue {
	/// Framed as an array of bulk strings
	Sequence(Vec<EncodableValue>),
	Integer(i64),
	/// Framed as an integer, truncated toward zero
	Float(f64),
	/// Framed as the integer 1 or 0
	Boolean(bool),
	Bytes(Bytes),
	Text(String),
	/// Framed as the null bulk string
	Null,
}

impl EncodableValue {
	/// Body used when the value is framed as a bulk string inside an array.
	///
	/// Returns `None` for sequences and null, which keep their own framing.
	pub fn to_bulk_bytes(&self) -> Option<Bytes> {
		match self {
			EncodableValue::Integer(i) => Some(Bytes::from(i.to_string())),
			EncodableValue::Float(f) => Some(Bytes::from(truncate(*f).to_string())),
			EncodableValue::Boolean(b) => Some(Bytes::from_static(if *b { b"1" } else { b"0" })),
			EncodableValue::Bytes(b) => Some(b.clone()),
			EncodableValue::Text(s) => Some(Bytes::copy_from_slice(s.as_bytes())),
			EncodableValue::Sequence(_) | EncodableValue::Null => None,
		}
	}
}

/// Saturating truncation; NaN becomes 0.
#[inline]
pub(crate) fn truncate(f: f64) -> i64 {
	f as i64
}

impl From<&str> for EncodableValue {
	fn from(s: &str) -> Self {
		EncodableValue::Text(s.to_string())
	}
}

impl From<String> for EncodableValue {
	fn from(s: String) -> Self {
		EncodableValue::Text(s)
	}
}

impl From<&[u8]> for EncodableValue {
	fn from(b: &[u8]) -> Self {
		EncodableValue::Bytes(Bytes::copy_from_slice(b))
	}
}

impl From<Vec<u8>> for EncodableValue {
	fn from(v: Vec<u8>) -> Self {
		EncodableValue::Bytes(Bytes::from(v))
	}
}

impl From<Bytes> for EncodableValue {
	fn from(b: Bytes) -> Self {
		EncodableValue::Bytes(b)
	}
}

impl From<i64> for EncodableValue {
	fn from(i: i64) -> Self {
		EncodableValue::Integer(i)
	}
}

impl From<i32> for EncodableValue {
	fn from(i: i32) -> Self {
		EncodableValue::Integer(i as i64)
	}
}

impl From<u32> for EncodableValue {
	fn from(i: u32) -> Self {
		EncodableValue::Integer(i as i64)
	}
}

impl From<usize> for EncodableValue {
	fn from(i: usize) -> Self {
		EncodableValue::Integer(i64::try_from(i).unwrap_or(i64::MAX))
	}
}

impl From<f64> for EncodableValue {
	fn from(f: f64) -> Self {
		EncodableValue::Float(f)
	}
}

impl From<bool> for EncodableValue {
	fn from(b: bool) -> Self {
		EncodableValue::Boolean(b)
	}
}

impl<T: Into<EncodableValue>> From<Vec<T>> for EncodableValue {
	fn from(v: Vec<T>) -> Self {
		EncodableValue::Sequence(v.into_iter().map(|x| x.into()).collect())
	}
}

impl<T: Into<EncodableValue>> From<Option<T>> for EncodableValue {
	fn from(o: Option<T>) -> Self {
		match o {
			Some(v) => v.into(),
			None => EncodableValue::Null,
		}
	}
}
