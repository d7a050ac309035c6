use bytes::Bytes;
use resp::Decoder;
use resp::EncodableValue;
use resp::Encoder;
use resp::MemorySource;
use resp::ReplyValue;
use resp::RespError;

fn main() {
	println!("--- RESP Chunked Decode Example ---");

	// A transport has already cut the stream at CRLF boundaries:
	// - a pipelined batch of three replies in one array
	// - a null bulk string
	// - then the connection drops
	let chunks = [
		"*3",
		"+OK",
		"-WRONGTYPE Operation against a key holding the wrong kind of value",
		":1000",
		"$-1",
	];

	let mut decoder = Decoder::new(MemorySource::new(chunks));
	loop {
		match decoder.read_response() {
			Ok(ReplyValue::Array(Some(items))) => {
				println!("[Decode] Array with {} items", items.len());
				for item in items {
					match item.as_error() {
						Some(e) => println!("  -> error kept as data: {}", e),
						None => println!("  -> {:?}", item),
					}
				}
			}
			Ok(other) => println!("[Decode] {:?}", other),
			Err(RespError::ConnectionClosed) => {
				println!("[Decode] Source exhausted");
				break;
			}
			Err(e) => {
				println!("[Decode] Error: {}", e);
				break;
			}
		}
	}

	println!("\n--- RESP Encode Example ---");
	let mut encoder = Encoder::new(|segment: Bytes| -> std::io::Result<()> {
		println!("[Sink] {:?}", segment);
		Ok(())
	});
	println!("dirty before write: {}", encoder.is_dirty());
	encoder
		.encode(&EncodableValue::from(vec![1i64, 2, 3]))
		.expect("closure sink never fails");
	encoder.ok().expect("closure sink never fails");
	encoder
		.error("ERR unknown command")
		.expect("closure sink never fails");
	println!("dirty after write: {}", encoder.is_dirty());
}
