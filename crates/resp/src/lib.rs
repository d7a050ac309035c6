//! # RESP - Redis Serialization Protocol codec
//!
//! Decodes RESP2 replies from a source of pre-delimited chunks and encodes
//! values into RESP2 frames delivered through a sink.
//!
//! ## Features
//!
//! - **Chunked decoding**: the [`Decoder`] pulls one line or payload at a time
//!   from any [`ChunkSource`], recursing for arrays
//! - **Classified server errors**: error replies are returned as data, except
//!   the connection-fatal ones which abort the read
//! - **Sink-based encoding**: the [`Encoder`] writes each framed segment to a
//!   [`Sink`] and remembers whether anything was written
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use resp::Decoder;
//! use resp::EncodableValue;
//! use resp::Encoder;
//! use resp::MemorySource;
//! use resp::ReplyValue;
//!
//! // Decode a reply from pre-split chunks
//! let mut decoder = Decoder::new(MemorySource::new(["*2", "$3", "foo", ":1"]));
//! let reply = decoder.read_response().unwrap();
//! assert_eq!(
//!     reply,
//!     ReplyValue::array(vec![ReplyValue::bulk_string("foo"), ReplyValue::integer(1)])
//! );
//!
//! // Encode a reply into a byte buffer
//! let mut out = Vec::new();
//! let mut encoder = Encoder::new(|data: Bytes| -> std::io::Result<()> {
//!     out.extend_from_slice(&data);
//!     Ok(())
//! });
//! encoder.encode(&EncodableValue::from(vec!["a", "b"])).unwrap();
//! assert!(encoder.is_dirty());
//! drop(encoder);
//! assert_eq!(out, b"*2\r\n$1\r\na\r\n$1\r\nb\r\n");
//! ```

mod classify;
mod decoder;
mod encoder;
mod error;
mod options;
mod source;
mod types;
mod utils;

pub use classify::ServerErrorKind;
pub use classify::classify;
pub use decoder::Decoder;
pub use decoder::parse;
pub use encoder::DEFAULT_STATUS;
pub use encoder::Encoder;
pub use encoder::Sink;
pub use encoder::WriterSink;
pub use error::ProtocolError;
pub use error::RespError;
pub use options::DEFAULT_MAX_DEPTH;
pub use options::DecoderOptions;
pub use options::Encoding;
pub use options::UnknownEncoding;
pub use source::ChunkSource;
pub use source::MAX_BULK_LEN;
pub use source::MAX_LINE_LEN;
pub use source::MemorySource;
pub use source::StreamSource;
pub use types::EncodableValue;
pub use types::ErrorValue;
pub use types::Payload;
pub use types::ReplyValue;
