//! Log output of the binary.
//!
//! Logs are written to stderr so that generated SDL and query responses on
//! stdout can be piped elsewhere.

use anyhow::{Result, anyhow};
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cnf::DEFAULT_LOG_LEVEL;

#[derive(Debug, Default, Clone)]
pub struct Builder {
	log_level: Option<String>,
}

pub fn builder() -> Builder {
	Builder::default()
}

impl Builder {
	/// Set the log level on the builder
	pub fn with_log_level(mut self, log_level: &str) -> Self {
		self.log_level = Some(log_level.to_owned());
		self
	}

	/// Build a tracing dispatcher with the fmt subscriber
	pub fn build(self) -> Result<Box<dyn Subscriber + Send + Sync + 'static>> {
		let filter = filter_from_value(self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))?;
		let registry = tracing_subscriber::registry().with(
			tracing_subscriber::fmt::layer()
				.compact()
				.with_ansi(true)
				.with_target(true)
				.with_span_events(FmtSpan::NONE)
				.with_writer(std::io::stderr)
				.with_filter(filter),
		);
		Ok(Box::new(registry))
	}

	/// Install the dispatcher globally
	pub fn init(self) -> Result<()> {
		self.build()?.try_init()?;
		Ok(())
	}
}

/// Parses a log level into a filter.
///
/// A bare level applies to this binary and its library only, everything
/// else stays at `warn`. Anything else is read as a full filter directive.
pub fn filter_from_value(v: &str) -> Result<EnvFilter> {
	let directives = match v {
		"none" => "off".to_owned(),
		"error" | "warn" | "info" | "debug" | "trace" => {
			format!("warn,tablegql={v},tablegql_core={v}")
		}
		"full" => "trace".to_owned(),
		other => other.to_owned(),
	};
	EnvFilter::builder().parse(&directives).map_err(|e| anyhow!("invalid log filter `{v}`: {e}"))
}
