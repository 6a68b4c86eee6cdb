// src/error.rs

use thiserror::Error;

/// Errors the reconciliation engine distinguishes by recovery strategy.
/// Feed failures are not in here: the feed client reports them as an
/// explicit `FeedLookup::Unavailable` value and the engine falls back to
/// cached data per plugin.
#[derive(Debug, Error)]
pub enum CheckerError {
	/// The inventory entry carries neither a declared identifier nor a file
	/// path to derive one from. The affected plugin is skipped for the pass.
	#[error("plugin '{0}' has no identifier and no file path to derive one from")]
	MissingIdentifier(String),

	/// The persistence layer failed. Fatal to the pass; the previous cache
	/// state remains authoritative.
	#[error("cache store unavailable: {0}")]
	CacheUnavailable(anyhow::Error),
}
