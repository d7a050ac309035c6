//! Configuration for resp-tool
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags.
//!
//! ```toml
//! log_level = "debug"
//!
//! [decoder]
//! encoding = "utf-8"
//! max_depth = 32
//! ```

use std::path::Path;
use std::path::PathBuf;

pub use clap::Parser;
use clap::Subcommand;
use resp::DecoderOptions;
use resp::Encoding;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("Failed to read configuration file '{path}': {source}")]
	Io {
		source: std::io::Error,
		path: String,
	},

	#[error("Failed to parse TOML configuration: {0}")]
	TomlParse(#[from] toml::de::Error),
}

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	/// Configuration file path (TOML)
	#[arg(short, long, global = true)]
	pub config: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, global = true)]
	pub log_level: Option<String>,

	/// Transcode string payloads with this encoding (utf-8, ascii, latin-1)
	#[arg(long, global = true)]
	pub encoding: Option<Encoding>,

	/// Deepest array nesting accepted while decoding
	#[arg(long, global = true)]
	pub max_depth: Option<usize>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
	/// Decode every reply found in a RESP byte stream
	Decode {
		/// Input file; reads stdin when omitted
		file: Option<PathBuf>,
	},
	/// Frame the arguments as a RESP array of bulk strings
	Encode {
		#[arg(required = true)]
		args: Vec<String>,
	},
	/// Write a status reply
	Status {
		#[arg(default_value = resp::DEFAULT_STATUS)]
		message: String,
	},
	/// Write an error reply
	Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolConfig {
	pub log_level: String,
	pub decoder: DecoderOptions,
}

impl Default for ToolConfig {
	fn default() -> Self {
		Self {
			log_level: "warn".into(),
			decoder: DecoderOptions::default(),
		}
	}
}

impl ToolConfig {
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			source,
			path: path.display().to_string(),
		})?;
		Ok(toml::from_str(&content)?)
	}

	/// File settings (or defaults) with command-line overrides applied.
	pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
		let mut config = match &cli.config {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};

		if let Some(level) = &cli.log_level {
			config.log_level = level.clone();
		}
		if let Some(encoding) = cli.encoding {
			config.decoder.encoding = Some(encoding);
		}
		if let Some(max_depth) = cli.max_depth {
			config.decoder.max_depth = max_depth;
		}
		Ok(config)
	}
}
