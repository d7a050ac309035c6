//! RESP2 reply encoder writing framed segments to a [`Sink`].

use std::fmt::Display;
use std::io;
use std::io::Write;

use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;
use tracing::trace;

use crate::types::EncodableValue;
use crate::types::truncate;
use crate::utils::*;

/// Message of the default status reply.
pub const DEFAULT_STATUS: &str = "OK";

/// Receives framed segments from an [`Encoder`].
pub trait Sink {
	fn write(&mut self, data: Bytes) -> io::Result<()>;
}

impl<F> Sink for F
where
	F: FnMut(Bytes) -> io::Result<()>,
{
	fn write(&mut self, data: Bytes) -> io::Result<()> {
		self(data)
	}
}

/// Adapter writing every segment to an [`io::Write`] stream.
#[derive(Debug)]
pub struct WriterSink<W> {
	writer: W,
}

impl<W: Write> WriterSink<W> {
	pub fn new(writer: W) -> Self {
		Self { writer }
	}

	pub fn into_inner(self) -> W {
		self.writer
	}
}

impl<W: Write> Sink for WriterSink<W> {
	fn write(&mut self, data: Bytes) -> io::Result<()> {
		self.writer.write_all(&data)
	}
}

/// Serializes replies for one output session.
///
/// `dirty` turns true on the first write and stays true; it only tells
/// collaborators whether anything has been sent yet.
pub struct Encoder<S> {
	sink: S,
	dirty: bool,
}

impl<S: Sink> Encoder<S> {
	pub fn new(sink: S) -> Self {
		Self { sink, dirty: false }
	}

	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	pub fn get_ref(&self) -> &S {
		&self.sink
	}

	pub fn into_inner(self) -> S {
		self.sink
	}

	/// Frame a value: sequences as arrays, numbers and booleans as
	/// integers, everything else as a bulk string.
	pub fn encode(&mut self, value: &EncodableValue) -> io::Result<()> {
		match value {
			EncodableValue::Sequence(items) => self.encode_array(items),
			EncodableValue::Integer(i) => self.encode_integer(*i),
			EncodableValue::Float(f) => self.encode_integer(truncate(*f)),
			EncodableValue::Boolean(b) => self.encode_integer(i64::from(*b)),
			EncodableValue::Bytes(b) => self.bulk(b),
			EncodableValue::Text(s) => self.bulk(s.as_bytes()),
			EncodableValue::Null => self.write(Bytes::from_static(NULL_BULK_STRING)),
		}
	}

	/// Send a status: `+<message>\r\n`.
	///
	/// The message must not contain CR or LF; this is not checked.
	pub fn status(&mut self, message: &str) -> io::Result<()> {
		let mut buf = BytesMut::with_capacity(message.len() + 3);
		buf.put_u8(SIMPLE_STRING);
		buf.put_slice(message.as_bytes());
		buf.put_slice(CRLF);
		self.write(buf.freeze())
	}

	/// Send `+OK\r\n`.
	pub fn ok(&mut self) -> io::Result<()> {
		self.status(DEFAULT_STATUS)
	}

	/// Send an error: `-<message>\r\n`.
	pub fn error(&mut self, message: impl Display) -> io::Result<()> {
		self.write(Bytes::from(format!("-{message}\r\n")))
	}

	fn encode_integer(&mut self, i: i64) -> io::Result<()> {
		let mut buf = BytesMut::new();
		buf.put_u8(INTEGER);
		buf.put_slice(i.to_string().as_bytes());
		buf.put_slice(CRLF);
		self.write(buf.freeze())
	}

	// Scalars are bulk-framed, nested sequences become sub-arrays
	fn encode_array(&mut self, items: &[EncodableValue]) -> io::Result<()> {
		let mut header = BytesMut::new();
		encode_length(&mut header, ARRAY, items.len());
		self.write(header.freeze())?;

		for item in items {
			match item.to_bulk_bytes() {
				Some(data) => self.bulk(&data)?,
				None => self.encode(item)?,
			}
		}
		Ok(())
	}

	/// `$<len>\r\n<data>\r\n` in a single write
	fn bulk(&mut self, data: &[u8]) -> io::Result<()> {
		let mut buf = BytesMut::with_capacity(data.len() + 16);
		encode_length(&mut buf, BULK_STRING, data.len());
		buf.put_slice(data);
		buf.put_slice(CRLF);
		self.write(buf.freeze())
	}

	fn write(&mut self, data: Bytes) -> io::Result<()> {
		if !self.dirty {
			self.dirty = true;
		}
		trace!(len = data.len(), "writing segment");
		self.sink.write(data)
	}
}

#[inline]
fn encode_length(buf: &mut BytesMut, marker: u8, length: usize) {
	buf.put_u8(marker);
	buf.put_slice(length.to_string().as_bytes());
	buf.put_slice(CRLF);
}
