use std::sync::LazyLock;

/// The publicly visible name of the binary
pub const PKG_NAME: &str = "tablegql";

/// The log level used when neither `--log` nor the environment sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The version identifier of this build
pub static PKG_VERSION: LazyLock<String> =
	LazyLock::new(|| match option_env!("TABLEGQL_BUILD_METADATA") {
		Some(metadata) if !metadata.trim().is_empty() => {
			let version = env!("CARGO_PKG_VERSION");
			format!("{version}+{metadata}")
		}
		_ => env!("CARGO_PKG_VERSION").to_owned(),
	});
