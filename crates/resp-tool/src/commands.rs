use std::io;
use std::io::BufRead;
use std::io::Write;

use resp::Decoder;
use resp::DecoderOptions;
use resp::EncodableValue;
use resp::Encoder;
use resp::Payload;
use resp::ReplyValue;
use resp::RespError;
use resp::StreamSource;
use resp::WriterSink;
use thiserror::Error;
use tracing::debug;
use tracing::info;

/// Failure of the `decode` command.
#[derive(Error, Debug)]
pub enum DecodeError {
	#[error(transparent)]
	Resp(#[from] RespError),

	/// Writing to the output failed; the input side is fine
	#[error("Failed to write output: {0}")]
	Output(#[source] io::Error),
}

/// Print every reply in `input`, one per line, until the stream ends.
///
/// Returns the number of replies printed.
pub fn decode<R, W>(input: R, out: &mut W, options: DecoderOptions) -> Result<usize, DecodeError>
where
	R: BufRead,
	W: Write,
{
	let mut decoder = Decoder::with_options(StreamSource::new(input), options);
	let mut count = 0;
	loop {
		match decoder.read_response() {
			Ok(reply) => {
				debug!(kind = reply.type_name(), "decoded reply");
				writeln!(out, "{}", format_reply(&reply)).map_err(DecodeError::Output)?;
				count += 1;
			}
			Err(RespError::ConnectionClosed) => {
				info!(count, "end of input");
				return Ok(count);
			}
			Err(e) => return Err(e.into()),
		}
	}
}

pub fn encode_args<W: Write>(args: &[String], out: W) -> io::Result<()> {
	let mut encoder = Encoder::new(WriterSink::new(out));
	encoder.encode(&EncodableValue::from(args.to_vec()))
}

pub fn status<W: Write>(message: &str, out: W) -> io::Result<()> {
	Encoder::new(WriterSink::new(out)).status(message)
}

pub fn error<W: Write>(message: &str, out: W) -> io::Result<()> {
	Encoder::new(WriterSink::new(out)).error(message)
}

/// Human-readable rendering in the style of redis-cli.
pub fn format_reply(reply: &ReplyValue) -> String {
	let mut buf = String::new();
	render(reply, 0, &mut buf);
	buf
}

fn render(reply: &ReplyValue, indent: usize, buf: &mut String) {
	match reply {
		ReplyValue::SimpleString(p) => buf.push_str(&payload_text(p)),
		ReplyValue::Integer(i) => buf.push_str(&format!("(integer) {i}")),
		ReplyValue::BulkString(Some(p)) => {
			buf.push_str(&format!("\"{}\"", p.as_bytes().escape_ascii()))
		}
		ReplyValue::BulkString(None) | ReplyValue::Array(None) => buf.push_str("(nil)"),
		ReplyValue::Array(Some(items)) if items.is_empty() => buf.push_str("(empty array)"),
		ReplyValue::Array(Some(items)) => {
			let width = items.len().to_string().len();
			for (i, item) in items.iter().enumerate() {
				if i > 0 {
					buf.push('\n');
					buf.push_str(&" ".repeat(indent));
				}
				let label = format!("{:>width$}) ", i + 1);
				buf.push_str(&label);
				render(item, indent + label.len(), buf);
			}
		}
		ReplyValue::Error(e) => buf.push_str(&format!("(error) {}", e.full_text())),
	}
}

fn payload_text(payload: &Payload) -> String {
	match payload.as_str() {
		Some(s) => s.to_string(),
		None => String::from_utf8_lossy(payload.as_bytes()).into_owned(),
	}
}

#[cfg(test)]
mod tests {
	use resp::Encoding;
	use rstest::rstest;

	use super::*;

	fn decode_to_string(input: &[u8], options: DecoderOptions) -> (usize, String) {
		let mut out = Vec::new();
		let count = decode(input, &mut out, options).unwrap();
		(count, String::from_utf8(out).unwrap())
	}

	#[rstest]
	#[case(b"+PONG\r\n", "PONG")]
	#[case(b":42\r\n", "(integer) 42")]
	#[case(b"$5\r\nhello\r\n", "\"hello\"")]
	#[case(b"$2\r\n\x00\xff\r\n", "\"\\x00\\xff\"")]
	#[case(b"$-1\r\n", "(nil)")]
	#[case(b"*-1\r\n", "(nil)")]
	#[case(b"*0\r\n", "(empty array)")]
	#[case(b"-WRONGTYPE bad type\r\n", "(error) WRONGTYPE bad type")]
	fn test_format_single_reply(#[case] input: &[u8], #[case] expected: &str) {
		let (count, out) = decode_to_string(input, DecoderOptions::default());
		assert_eq!(count, 1);
		assert_eq!(out, format!("{expected}\n"));
	}

	#[test]
	fn test_format_nested_array() {
		let (_, out) = decode_to_string(
			b"*2\r\n*2\r\n:1\r\n:2\r\n$1\r\nx\r\n",
			DecoderOptions::default(),
		);
		assert_eq!(out, "1) 1) (integer) 1\n   2) (integer) 2\n2) \"x\"\n");
	}

	#[test]
	fn test_decode_multiple_replies() {
		let input = b"+OK\r\n:1\r\n+OK\r\n";
		let (count, out) = decode_to_string(input, DecoderOptions::default());
		assert_eq!(count, 3);
		assert_eq!(out.lines().count(), 3);
	}

	#[test]
	fn test_decode_empty_input() {
		let (count, out) = decode_to_string(b"", DecoderOptions::default());
		assert_eq!(count, 0);
		assert!(out.is_empty());
	}

	#[test]
	fn test_decode_with_encoding() {
		let options = DecoderOptions::default().with_encoding(Encoding::Latin1);
		let (_, out) = decode_to_string(b"+caf\xe9\r\n", options);
		assert_eq!(out, "café\n");
	}

	#[test]
	fn test_decode_stops_on_fatal_error() {
		let mut out = Vec::new();
		let err = decode(
			&b"+OK\r\n-ERR max number of clients reached\r\n"[..],
			&mut out,
			DecoderOptions::default(),
		)
		.unwrap_err();
		assert!(matches!(err, DecodeError::Resp(RespError::Server(_))));
		assert_eq!(out, b"OK\n");
	}

	#[test]
	fn test_decode_output_failure_is_not_a_source_error() {
		struct ClosedPipe;

		impl Write for ClosedPipe {
			fn write(&mut self, _: &[u8]) -> io::Result<usize> {
				Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
			}

			fn flush(&mut self) -> io::Result<()> {
				Ok(())
			}
		}

		let input = &b"+OK\r\n"[..];
		let err = decode(input, &mut ClosedPipe, DecoderOptions::default()).unwrap_err();
		match err {
			DecodeError::Output(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
			other => panic!("Expected Output error, got {:?}", other),
		}
	}

	#[test]
	fn test_encode_args() {
		let mut out = Vec::new();
		encode_args(&["SET".into(), "k".into(), "v".into()], &mut out).unwrap();
		assert_eq!(out, b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n");
	}

	#[test]
	fn test_status_and_error() {
		let mut out = Vec::new();
		status("OK", &mut out).unwrap();
		error("ERR unknown command", &mut out).unwrap();
		assert_eq!(out, b"+OK\r\n-ERR unknown command\r\n");
	}
}
