mod commands;
mod config;

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::Write;

use config::Cli;
use config::Command;
use config::Parser;
use config::ToolConfig;
use tracing::debug;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	let cli = Cli::parse();
	let config = ToolConfig::load(&cli)?;

	telemetry::init(&config.log_level)?;
	debug!(?config, "configuration loaded");

	let stdout = io::stdout();
	let mut out = stdout.lock();

	match cli.command {
		Command::Decode { file } => {
			let count = match file {
				Some(path) => {
					info!(path = %path.display(), "decoding file");
					let reader = BufReader::new(File::open(&path)?);
					commands::decode(reader, &mut out, config.decoder)?
				}
				None => commands::decode(io::stdin().lock(), &mut out, config.decoder)?,
			};
			debug!(count, "decode finished");
		}
		Command::Encode { args } => commands::encode_args(&args, &mut out)?,
		Command::Status { message } => commands::status(&message, &mut out)?,
		Command::Error { message } => commands::error(&message, &mut out)?,
	}

	out.flush()?;
	Ok(())
}
