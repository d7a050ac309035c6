//! Decoder configuration.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::error::RespError;

/// Default limit on array nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown encoding: {0}")]
pub struct UnknownEncoding(pub String);

/// Text encodings a decoder can transcode string payloads with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Encoding {
	Utf8,
	Ascii,
	Latin1,
}

impl Encoding {
	pub fn label(self) -> &'static str {
		match self {
			Encoding::Utf8 => "utf-8",
			Encoding::Ascii => "ascii",
			Encoding::Latin1 => "latin-1",
		}
	}

	/// Strictly decode `data`; invalid sequences are an error, never replaced.
	pub fn decode(self, data: &[u8]) -> Result<String, RespError> {
		match self {
			Encoding::Utf8 => std::str::from_utf8(data)
				.map(str::to_owned)
				.map_err(|e| RespError::Decoding(format!("'utf-8' codec: {e}"))),
			Encoding::Ascii => match data.iter().position(|b| !b.is_ascii()) {
				Some(pos) => Err(RespError::Decoding(format!(
					"'ascii' codec: byte 0x{:02x} in position {pos} out of range",
					data[pos]
				))),
				None => Ok(data.iter().map(|&b| char::from(b)).collect()),
			},
			Encoding::Latin1 => Ok(data.iter().map(|&b| char::from(b)).collect()),
		}
	}
}

impl fmt::Display for Encoding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

impl FromStr for Encoding {
	type Err = UnknownEncoding;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().replace('_', "-").as_str() {
			"utf-8" | "utf8" => Ok(Encoding::Utf8),
			"ascii" | "us-ascii" => Ok(Encoding::Ascii),
			"latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
			_ => Err(UnknownEncoding(s.to_string())),
		}
	}
}

impl TryFrom<String> for Encoding {
	type Error = UnknownEncoding;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		s.parse()
	}
}

impl From<Encoding> for String {
	fn from(e: Encoding) -> Self {
		e.label().to_string()
	}
}

/// Per-decoder settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DecoderOptions {
	/// Transcode simple and bulk string payloads to text
	pub encoding: Option<Encoding>,
	/// Deepest array nesting accepted before failing with a protocol error
	pub max_depth: usize,
}

impl Default for DecoderOptions {
	fn default() -> Self {
		Self {
			encoding: None,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl DecoderOptions {
	pub fn with_encoding(mut self, encoding: Encoding) -> Self {
		self.encoding = Some(encoding);
		self
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}
}
