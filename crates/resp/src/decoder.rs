//! RESP2 reply decoder over a [`ChunkSource`].

use std::io;

use bytes::Bytes;
use tracing::debug;
use tracing::trace;

use crate::classify::classify;
use crate::error::ProtocolError;
use crate::error::RespError;
use crate::options::DecoderOptions;
use crate::source::ChunkSource;
use crate::source::StreamSource;
use crate::types::Payload;
use crate::types::ReplyValue;
use crate::utils::*;

/// Upper bound on the capacity reserved from an array header alone.
const MAX_PREALLOC: usize = 1024;

/// Decodes one reply per [`read_response`](Decoder::read_response) call.
pub struct Decoder<S> {
	source: S,
	options: DecoderOptions,
}

impl<S: ChunkSource> Decoder<S> {
	pub fn new(source: S) -> Self {
		Self::with_options(source, DecoderOptions::default())
	}

	pub fn with_options(source: S, options: DecoderOptions) -> Self {
		Self { source, options }
	}

	pub fn options(&self) -> &DecoderOptions {
		&self.options
	}

	pub fn get_ref(&self) -> &S {
		&self.source
	}

	pub fn get_mut(&mut self) -> &mut S {
		&mut self.source
	}

	pub fn into_inner(self) -> S {
		self.source
	}

	/// Read one complete reply.
	///
	/// Server errors come back as [`ReplyValue::Error`], at the top level
	/// and inside arrays alike, unless classified as connection-fatal. Any
	/// `Err` leaves no partial value behind.
	pub fn read_response(&mut self) -> Result<ReplyValue, RespError> {
		self.read_value(0)
	}

	fn read_value(&mut self, depth: usize) -> Result<ReplyValue, RespError> {
		let raw = self.read_chunk()?;
		if raw.is_empty() {
			return Err(RespError::ConnectionClosed);
		}

		let marker = raw[0];
		let body = raw.slice(1..);
		trace!(marker = %char::from(marker), depth, "decoding reply");

		match marker {
			SIMPLE_STRING => Ok(ReplyValue::SimpleString(self.payload(body)?)),
			INTEGER => Ok(ReplyValue::Integer(parse_integer(&body)?)),
			BULK_STRING => self.read_bulk_string(&body),
			ARRAY => self.read_array(&body, depth),
			ERROR => self.read_error(&body),
			_ => {
				debug!(chunk = ?raw, "unknown type marker");
				Err(ProtocolError::InvalidTypeMarker { raw }.into())
			}
		}
	}

	fn read_chunk(&mut self) -> Result<Bytes, RespError> {
		self.source.next_chunk().map_err(|e| match e.kind() {
			io::ErrorKind::UnexpectedEof => RespError::ConnectionClosed,
			_ => RespError::Io(e),
		})
	}

	fn read_bulk_string(&mut self, header: &[u8]) -> Result<ReplyValue, RespError> {
		let Some(expected) = parse_length(header)? else {
			return Ok(ReplyValue::BulkString(None));
		};

		// An empty payload chunk is a legal `$0` body, so no closed check here
		let data = self.read_chunk()?;
		if data.len() != expected {
			debug!(expected, actual = data.len(), "bulk length mismatch");
			return Err(RespError::DataIntegrity {
				expected,
				actual: data.len(),
			});
		}

		Ok(ReplyValue::BulkString(Some(self.payload(data)?)))
	}

	fn read_array(&mut self, header: &[u8], depth: usize) -> Result<ReplyValue, RespError> {
		let Some(count) = parse_length(header)? else {
			return Ok(ReplyValue::Array(None));
		};
		if depth >= self.options.max_depth {
			debug!(depth, "array nesting too deep");
			return Err(ProtocolError::NestingTooDeep(self.options.max_depth).into());
		}

		let mut elements = Vec::with_capacity(count.min(MAX_PREALLOC));
		for _ in 0..count {
			elements.push(self.read_value(depth + 1)?);
		}
		Ok(ReplyValue::Array(Some(elements)))
	}

	fn read_error(&mut self, body: &[u8]) -> Result<ReplyValue, RespError> {
		let error = classify(&String::from_utf8_lossy(body));
		if error.kind().is_connection_fatal() {
			debug!(error = %error, "connection-fatal server error");
			return Err(RespError::Server(error));
		}
		Ok(ReplyValue::Error(error))
	}

	fn payload(&self, data: Bytes) -> Result<Payload, RespError> {
		match self.options.encoding {
			Some(encoding) => Ok(Payload::Text(encoding.decode(&data)?)),
			None => Ok(Payload::Raw(data)),
		}
	}
}

/// Convenience function for one-off decoding of a complete wire buffer.
pub fn parse(buf: &[u8]) -> Result<ReplyValue, RespError> {
	Decoder::new(StreamSource::new(buf)).read_response()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::options::Encoding;
	use crate::source::MemorySource;

	fn decoder(chunks: &[&str]) -> Decoder<MemorySource> {
		Decoder::new(MemorySource::new(chunks))
	}

	#[test]
	fn test_parse_simple_string() {
		let value = decoder(&["+OK"]).read_response().unwrap();
		assert_eq!(value, ReplyValue::simple_string("OK"));
	}

	#[test]
	fn test_parse_integer() {
		let value = decoder(&[":-1000"]).read_response().unwrap();
		assert_eq!(value, ReplyValue::Integer(-1000));
	}

	#[test]
	fn test_parse_invalid_integer() {
		let err = decoder(&[":12a"]).read_response().unwrap_err();
		assert!(matches!(
			err,
			RespError::Protocol(ProtocolError::InvalidInteger(_))
		));
	}

	#[test]
	fn test_parse_bulk_string() {
		let mut decoder = decoder(&["$6", "foobar"]);
		let value = decoder.read_response().unwrap();
		assert_eq!(value, ReplyValue::bulk_string("foobar"));
		assert_eq!(decoder.get_ref().position(), 2);
	}

	#[test]
	fn test_parse_empty_bulk_string() {
		let value = decoder(&["$0", ""]).read_response().unwrap();
		assert_eq!(value, ReplyValue::bulk_string(""));
	}

	#[test]
	fn test_parse_invalid_bulk_length() {
		let err = decoder(&["$-3"]).read_response().unwrap_err();
		assert!(matches!(
			err,
			RespError::Protocol(ProtocolError::InvalidLength(-3))
		));
	}

	#[test]
	fn test_parse_nested_array() {
		let value = decoder(&["*2", "*1", ":1", "$-1"]).read_response().unwrap();
		assert_eq!(
			value,
			ReplyValue::array(vec![
				ReplyValue::array(vec![ReplyValue::Integer(1)]),
				ReplyValue::null_bulk(),
			])
		);
	}

	#[test]
	fn test_parse_empty_array() {
		let value = decoder(&["*0"]).read_response().unwrap();
		assert_eq!(value, ReplyValue::array(Vec::new()));
	}

	#[test]
	fn test_error_inside_array_is_data() {
		let value = decoder(&["*2", "-WRONGTYPE bad", "+OK"])
			.read_response()
			.unwrap();
		let items = value.into_vec().unwrap();
		assert!(items[0].is_error());
		assert_eq!(items[1], ReplyValue::simple_string("OK"));
	}

	#[test]
	fn test_fatal_error_unwinds_array() {
		let err = decoder(&["*2", "+OK", "-ERR max number of clients reached"])
			.read_response()
			.unwrap_err();
		match err {
			RespError::Server(e) => assert_eq!(e.message(), "max number of clients reached"),
			other => panic!("Expected Server error, got {:?}", other),
		}
	}

	#[test]
	fn test_error_text_is_lossy() {
		let mut decoder = Decoder::new(MemorySource::new([&b"-ERR bad \xff byte"[..]]));
		let value = decoder.read_response().unwrap();
		assert_eq!(value.as_error().unwrap().message(), "bad \u{fffd} byte");
	}

	#[test]
	fn test_depth_limit() {
		let options = DecoderOptions::default().with_max_depth(2);
		let shallow = MemorySource::new(["*1", "*1", ":1"]);
		let mut ok = Decoder::with_options(shallow, options.clone());
		assert!(ok.read_response().is_ok());

		let nested = MemorySource::new(["*1", "*1", "*1", ":1"]);
		let mut deep = Decoder::with_options(nested, options);
		let err = deep.read_response().unwrap_err();
		assert!(matches!(
			err,
			RespError::Protocol(ProtocolError::NestingTooDeep(2))
		));
	}

	#[test]
	fn test_null_array_ignores_depth_limit() {
		let options = DecoderOptions::default().with_max_depth(0);
		let mut decoder = Decoder::with_options(MemorySource::new(["*-1"]), options);
		assert_eq!(decoder.read_response().unwrap(), ReplyValue::null_array());
	}

	#[test]
	fn test_encoding_replaces_payload() {
		let options = DecoderOptions::default().with_encoding(Encoding::Utf8);
		let source = MemorySource::new(["+OK", "$5", "héll"]);
		let mut decoder = Decoder::with_options(source, options);

		match decoder.read_response().unwrap() {
			ReplyValue::SimpleString(p) => assert!(p.is_text()),
			other => panic!("Expected SimpleString, got {:?}", other),
		}
		match decoder.read_response().unwrap() {
			ReplyValue::BulkString(Some(Payload::Text(s))) => assert_eq!(s, "héll"),
			other => panic!("Expected text BulkString, got {:?}", other),
		}
	}

	#[test]
	fn test_encoding_is_strict() {
		let options = DecoderOptions::default().with_encoding(Encoding::Ascii);
		let mut decoder =
			Decoder::with_options(MemorySource::new([&b"$2"[..], b"\xc3\xa9"]), options);
		assert!(matches!(
			decoder.read_response(),
			Err(RespError::Decoding(_))
		));
	}

	#[test]
	fn test_integers_are_not_transcoded() {
		let options = DecoderOptions::default().with_encoding(Encoding::Ascii);
		let mut decoder = Decoder::with_options(MemorySource::new([":7"]), options);
		assert_eq!(decoder.read_response().unwrap(), ReplyValue::Integer(7));
	}

	#[test]
	fn test_io_error_propagates() {
		struct Broken;

		impl ChunkSource for Broken {
			fn next_chunk(&mut self) -> io::Result<Bytes> {
				Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
			}
		}

		let err = Decoder::new(Broken).read_response().unwrap_err();
		assert!(matches!(err, RespError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
		assert!(err.is_connection_error());
	}

	#[test]
	fn test_parse_convenience() {
		let value = parse(b"*2\r\n$3\r\nfoo\r\n:5\r\n").unwrap();
		assert_eq!(
			value,
			ReplyValue::array(vec![ReplyValue::bulk_string("foo"), ReplyValue::Integer(5)])
		);
	}

	#[test]
	fn test_parse_truncated_payload_is_connection_closed() {
		let err = parse(b"$10\r\nabc").unwrap_err();
		assert!(matches!(err, RespError::ConnectionClosed));
	}

	#[test]
	fn test_parse_huge_bulk_length() {
		let err = parse(b"$9223372036854775807\r\nabc\r\n").unwrap_err();
		assert!(matches!(err, RespError::Io(ref e) if e.kind() == io::ErrorKind::InvalidData));
	}
}
