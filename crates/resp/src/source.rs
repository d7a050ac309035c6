//! Chunk sources feeding the decoder.
//!
//! A chunk is one protocol line with its CRLF already stripped, or one bulk
//! payload. An empty chunk means the other end is gone.

use std::io;
use std::io::BufRead;
use std::io::Read;

use bytes::Bytes;

use crate::utils::BULK_STRING;
use crate::utils::CRLF;
use crate::utils::parse_integer;

/// Longest line accepted by [`StreamSource`], CRLF excluded.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Largest bulk payload accepted by [`StreamSource`].
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Supplies the decoder with pre-delimited chunks, in protocol order.
pub trait ChunkSource {
	/// Next chunk, or an empty one once the stream is closed.
	fn next_chunk(&mut self) -> io::Result<Bytes>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
	fn next_chunk(&mut self) -> io::Result<Bytes> {
		(**self).next_chunk()
	}
}

/// Chunks held in memory, handed out in order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
	chunks: Vec<Bytes>,
	pos: usize,
}

impl MemorySource {
	pub fn new<I, C>(chunks: I) -> Self
	where
		I: IntoIterator<Item = C>,
		C: AsRef<[u8]>,
	{
		Self {
			chunks: chunks
				.into_iter()
				.map(|c| Bytes::copy_from_slice(c.as_ref()))
				.collect(),
			pos: 0,
		}
	}

	/// Number of chunks consumed so far.
	pub fn position(&self) -> usize {
		self.pos
	}

	pub fn remaining(&self) -> usize {
		self.chunks.len().saturating_sub(self.pos)
	}
}

impl ChunkSource for MemorySource {
	fn next_chunk(&mut self) -> io::Result<Bytes> {
		match self.chunks.get(self.pos) {
			Some(chunk) => {
				self.pos += 1;
				Ok(chunk.clone())
			}
			None => Ok(Bytes::new()),
		}
	}
}

/// Splits a buffered byte stream into chunks.
///
/// Lines are read up to CRLF. After a `$<n>` header with `n >= 0` the next
/// chunk is exactly `n` payload bytes, so binary payloads containing CRLF
/// come through intact.
#[derive(Debug)]
pub struct StreamSource<R> {
	reader: R,
	pending_bulk: Option<usize>,
	line: Vec<u8>,
}

impl<R: BufRead> StreamSource<R> {
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			pending_bulk: None,
			line: Vec::new(),
		}
	}

	pub fn get_ref(&self) -> &R {
		&self.reader
	}

	pub fn into_inner(self) -> R {
		self.reader
	}

	fn read_line(&mut self) -> io::Result<Bytes> {
		self.line.clear();
		let limit = (MAX_LINE_LEN + CRLF.len()) as u64;
		let n = (&mut self.reader)
			.take(limit)
			.read_until(b'\n', &mut self.line)?;
		if n == 0 {
			return Ok(Bytes::new());
		}
		if !self.line.ends_with(CRLF) {
			if n as u64 == limit {
				return Err(io::Error::new(
					io::ErrorKind::InvalidData,
					format!("line exceeds maximum length of {MAX_LINE_LEN} bytes"),
				));
			}
			return Err(io::Error::new(
				io::ErrorKind::InvalidData,
				"line is not terminated by CRLF",
			));
		}
		self.line.truncate(self.line.len() - CRLF.len());

		if self.line.first() == Some(&BULK_STRING) {
			if let Ok(length) = parse_integer(&self.line[1..]) {
				self.pending_bulk = usize::try_from(length).ok();
			}
		}
		Ok(Bytes::copy_from_slice(&self.line))
	}

	fn read_payload(&mut self, length: usize) -> io::Result<Bytes> {
		if length > MAX_BULK_LEN {
			return Err(io::Error::new(
				io::ErrorKind::InvalidData,
				format!("bulk length {length} exceeds maximum of {MAX_BULK_LEN} bytes"),
			));
		}

		// Grows with the bytes that arrive, not with the announced length
		let expected = length + CRLF.len();
		let mut data = Vec::new();
		(&mut self.reader)
			.take(expected as u64)
			.read_to_end(&mut data)?;
		if data.len() < expected {
			return Err(io::Error::new(
				io::ErrorKind::UnexpectedEof,
				"bulk payload ended early",
			));
		}
		if &data[length..] != CRLF {
			return Err(io::Error::new(
				io::ErrorKind::InvalidData,
				"bulk payload is not terminated by CRLF",
			));
		}
		data.truncate(length);
		Ok(Bytes::from(data))
	}
}

impl<R: BufRead> ChunkSource for StreamSource<R> {
	fn next_chunk(&mut self) -> io::Result<Bytes> {
		match self.pending_bulk.take() {
			Some(length) => self.read_payload(length),
			None => self.read_line(),
		}
	}
}
