// src/utils/feed_api.rs

use std::collections::HashMap;
use std::future::Future;

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::config::Settings;
use crate::models::vulnerability::VulnerabilityRecord;

/// Outcome of a single feed lookup. `Unavailable` covers transport failures,
/// timeouts, non-2xx responses and bodies that do not match the expected
/// shape; the caller falls back to previously cached data in that case.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedLookup {
	Records(Vec<VulnerabilityRecord>),
	Unavailable,
}

/// Seam between the reconciliation engine and the remote feed.
pub trait VulnerabilityFeed: Send + Sync {
	fn fetch_records(&self, identifier: &str) -> impl Future<Output = FeedLookup> + Send;
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
	#[serde(default)]
	vulnerabilities: Vec<VulnerabilityRecord>,
}

#[derive(Clone)]
pub struct FeedClient {
	client: reqwest::Client,
	base_url: String,
}

impl FeedClient {
	pub fn new(settings: &Settings) -> Result<Self> {
		let mut headers = HeaderMap::new();
		headers.insert(
			USER_AGENT,
			HeaderValue::from_static("Plugin-Vulnerability-Checker/0.1"),
		);

		let client = reqwest::Client::builder()
			.default_headers(headers)
			.timeout(settings.feed_timeout)
			.danger_accept_invalid_certs(settings.accept_invalid_certs)
			.build()
			.context("Failed to create HTTP client")?;

		Ok(Self {
			client,
			base_url: settings.feed_base_url.trim_end_matches('/').to_string(),
		})
	}
}

impl VulnerabilityFeed for FeedClient {
	/// Fetches the known vulnerabilities for one plugin identifier. Never
	/// errors out; every failure maps to `FeedLookup::Unavailable`.
	async fn fetch_records(&self, identifier: &str) -> FeedLookup {
		let url = format!("{}/{}", self.base_url, identifier);
		debug!("Fetching vulnerability data for '{}'", identifier);

		let response = match self.client.get(&url).send().await {
			Ok(response) => response,
			Err(e) => {
				warn!("Feed request for '{}' failed: {}", identifier, e);
				return FeedLookup::Unavailable;
			}
		};

		if !response.status().is_success() {
			warn!(
				"Feed returned status {} for '{}'",
				response.status(),
				identifier
			);
			return FeedLookup::Unavailable;
		}

		let body = match response.text().await {
			Ok(body) => body,
			Err(e) => {
				warn!("Failed to read feed response for '{}': {}", identifier, e);
				return FeedLookup::Unavailable;
			}
		};

		match parse_records(&body, identifier) {
			Some(records) => FeedLookup::Records(records),
			None => {
				warn!(
					"Feed response for '{}' did not match the expected shape",
					identifier
				);
				FeedLookup::Unavailable
			}
		}
	}
}

/// Parses a feed body of the form
/// `{ "<identifier>": { "vulnerabilities": [ { "title": .., "fixed_in": .. } ] } }`.
/// A well-formed body that lacks the identifier means the feed does not know
/// the plugin; that is an empty record list, not a failure.
fn parse_records(body: &str, identifier: &str) -> Option<Vec<VulnerabilityRecord>> {
	let entries: HashMap<String, FeedEntry> = serde_json::from_str(body).ok()?;
	Some(
		entries
			.get(identifier)
			.map(|entry| entry.vulnerabilities.clone())
			.unwrap_or_default(),
	)
}
