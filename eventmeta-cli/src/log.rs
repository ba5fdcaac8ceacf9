use clap::Args;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Logging flags shared by every command.
#[derive(Args, Clone, Debug)]
pub struct Log {
	/// The log level, or a full `EnvFilter` directive such as `eventmeta=trace`.
	#[arg(long = "log-level", env = "EVENTMETA_LOG", default_value = "info")]
	pub level: String,
}

impl Log {
	pub fn filter(&self) -> EnvFilter {
		EnvFilter::builder()
			.with_default_directive(LevelFilter::INFO.into())
			.parse_lossy(&self.level)
	}

	// Logs go to stderr so payloads can be written to stdout.
	pub fn init(&self) {
		tracing_subscriber::fmt()
			.with_env_filter(self.filter())
			.with_writer(std::io::stderr)
			.init();
	}
}
