//! stderr logging for command-line binaries.
//!
//! stdout carries protocol bytes or decoded replies, so every event goes to
//! stderr. ANSI colors are only used when stderr is a terminal.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload;
use tracing_subscriber::util::SubscriberInitExt;

use crate::TelemetryError;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// `[YYYY-MM-DD HH:MM:SS.micros]` in local time.
struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
	fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
		let now = chrono::Local::now();
		write!(w, "{}", now.format("[%Y-%m-%d %H:%M:%S%.6f]"))
	}
}

static FILTER_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

fn parse_level(level: &str) -> Result<&'static str, TelemetryError> {
	let lower = level.to_ascii_lowercase();
	LEVELS
		.into_iter()
		.find(|known| *known == lower)
		.ok_or_else(|| TelemetryError::InvalidLogLevel(level.to_string()))
}

/// `RUST_LOG` when set and valid, `level` otherwise.
fn initial_filter(level: &'static str) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber.
///
/// Only the first call installs anything; later calls still validate
/// `level` but leave the running subscriber alone.
///
/// ```no_run
/// telemetry::init("debug")?;
/// tracing::debug!("configuration loaded");
/// # Ok::<(), telemetry::TelemetryError>(())
/// ```
pub fn init(level: &str) -> Result<(), TelemetryError> {
	let level = parse_level(level)?;
	let (filter, handle) = reload::Layer::new(initial_filter(level));
	if FILTER_HANDLE.set(handle).is_err() {
		return Ok(());
	}

	let stderr = std::io::stderr();
	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_ansi(stderr.is_terminal())
				.with_timer(LocalTimestamp)
				.with_target(true),
		)
		.init();
	Ok(())
}

/// Swap the active level, replacing any `RUST_LOG` directives.
pub fn reload_log_level(level: &str) -> Result<(), TelemetryError> {
	let level = parse_level(level)?;
	let handle = FILTER_HANDLE.get().ok_or(TelemetryError::NotInitialized)?;
	handle
		.reload(EnvFilter::new(level))
		.map_err(|e| TelemetryError::ReloadFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("warn", "warn")]
	#[case("TRACE", "trace")]
	#[case("DeBuG", "debug")]
	fn test_parse_level(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(parse_level(input).unwrap(), expected);
	}

	#[rstest]
	#[case("warning")]
	#[case("verbose")]
	#[case("")]
	fn test_parse_level_rejects(#[case] input: &str) {
		assert_eq!(
			parse_level(input),
			Err(TelemetryError::InvalidLogLevel(input.to_string()))
		);
	}

	// No test in this binary installs a subscriber
	#[test]
	fn test_reload_before_init() {
		assert_eq!(
			reload_log_level("info"),
			Err(TelemetryError::NotInitialized)
		);
		assert!(matches!(
			reload_log_level("loud"),
			Err(TelemetryError::InvalidLogLevel(_))
		));
	}

	#[test]
	fn test_init_rejects_invalid_level() {
		assert_eq!(
			init("loud"),
			Err(TelemetryError::InvalidLogLevel("loud".to_string()))
		);
	}
}
