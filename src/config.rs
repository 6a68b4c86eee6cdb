// src/config.rs

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FEED_URL: &str = "https://wpvulndb.com/api/v2/plugins";
pub const DEFAULT_ALERT_RECIPIENT: &str = "admin@localhost";
const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Debug, Clone)]
pub struct Settings {
	/// Base endpoint of the vulnerability feed; the plugin identifier is
	/// appended as the final path segment.
	pub feed_base_url: String,
	pub feed_timeout: Duration,
	/// Skips TLS certificate verification on feed requests when set.
	pub accept_invalid_certs: bool,
	pub alerts_enabled: bool,
	/// Alert destination. `None` falls back to `DEFAULT_ALERT_RECIPIENT`.
	pub alert_recipient: Option<String>,
	/// JSON manifest listing the installed plugins.
	pub manifest_path: PathBuf,
	pub database_path: PathBuf,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			feed_base_url: DEFAULT_FEED_URL.to_string(),
			feed_timeout: DEFAULT_FEED_TIMEOUT,
			accept_invalid_certs: false,
			alerts_enabled: true,
			alert_recipient: None,
			manifest_path: PathBuf::from("plugins.json"),
			database_path: PathBuf::from("database").join("plugin-cache.db"),
		}
	}
}

impl Settings {
	/// Builds settings from `VPC_*` environment variables, keeping defaults
	/// for anything unset or unparseable.
	pub fn from_env() -> Self {
		let mut settings = Settings::default();

		if let Ok(url) = env::var("VPC_FEED_URL") {
			settings.feed_base_url = url;
		}
		if let Some(secs) = env::var("VPC_FEED_TIMEOUT_SECS")
			.ok()
			.and_then(|v| v.parse::<u64>().ok())
		{
			settings.feed_timeout = Duration::from_secs(secs);
		}
		if let Ok(value) = env::var("VPC_ACCEPT_INVALID_CERTS") {
			settings.accept_invalid_certs = parse_bool(&value);
		}
		if let Ok(value) = env::var("VPC_ALERTS_ENABLED") {
			settings.alerts_enabled = parse_bool(&value);
		}
		if let Ok(recipient) = env::var("VPC_ALERT_RECIPIENT") {
			if !recipient.is_empty() {
				settings.alert_recipient = Some(recipient);
			}
		}
		if let Ok(path) = env::var("VPC_PLUGIN_MANIFEST") {
			settings.manifest_path = PathBuf::from(path);
		}
		if let Ok(path) = env::var("VPC_DATABASE_PATH") {
			settings.database_path = PathBuf::from(path);
		}

		settings
	}
}

fn parse_bool(value: &str) -> bool {
	value == "1" || value.eq_ignore_ascii_case("true")
}
