// src/engine/reconciler.rs

use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};

use crate::config::Settings;
use crate::engine::alert::{self, Notifier};
use crate::error::CheckerError;
use crate::models::plugin::{PluginInfo, PluginReport};
use crate::repositories::cache_repo::CacheRepository;
use crate::utils::feed_api::{FeedLookup, VulnerabilityFeed};

/// Result of one reconciliation pass.
pub struct PassOutcome {
	pub reports: Vec<PluginReport>,
	/// Names of plugins flagged vulnerable in this pass.
	pub vulnerable: Vec<String>,
	/// Names of plugins skipped because no lookup key could be resolved.
	pub skipped: Vec<String>,
}

/// Orchestrates a reconciliation pass: resolve each plugin's lookup key,
/// fetch or reuse cached vulnerability records, recompute vulnerability
/// status against the live installed version, and persist the collection
/// atomically. The inventory is always passed in explicitly; the engine
/// holds no process-wide plugin state.
#[derive(Clone)]
pub struct Reconciler<F: VulnerabilityFeed> {
	feed: F,
	cache: CacheRepository,
	settings: Settings,
}

impl<F: VulnerabilityFeed> Reconciler<F> {
	pub fn new(feed: F, cache: CacheRepository, settings: Settings) -> Self {
		Self {
			feed,
			cache,
			settings,
		}
	}

	/// Online pass: consults the remote feed for every inventory item. Feed
	/// calls fan out concurrently; each item's outcome reflects only its own
	/// call, and a single feed failure falls back to that item's cached
	/// records without disturbing the rest of the pass.
	pub async fn reconcile_fresh(
		&self,
		inventory: &[PluginInfo],
		silent: bool,
		notifier: &dyn Notifier,
	) -> Result<PassOutcome> {
		let prior = self.read_prior_reports().await?;

		let results = futures::future::join_all(
			inventory
				.iter()
				.map(|plugin| self.enrich_plugin(plugin, &prior)),
		)
		.await;

		let mut reports = Vec::with_capacity(inventory.len());
		let mut skipped = Vec::new();

		for (plugin, result) in inventory.iter().zip(results) {
			match result {
				Ok(report) => reports.push(report),
				Err(e) => {
					warn!("Skipping '{}': {}", plugin.name, e);
					skipped.push(plugin.name.clone());
				}
			}
		}

		self.cache
			.write_all(&reports)
			.await
			.map_err(CheckerError::CacheUnavailable)?;

		let vulnerable = vulnerable_names(&reports);
		info!(
			"Online pass complete: {} plugins checked, {} vulnerable, {} skipped",
			reports.len(),
			vulnerable.len(),
			skipped.len()
		);

		if let Err(e) = alert::dispatch(&vulnerable, &self.settings, silent, notifier) {
			warn!("Failed to send vulnerability alert: {}", e);
		}

		Ok(PassOutcome {
			reports,
			vulnerable,
			skipped,
		})
	}

	/// Offline pass: no network. Keeps the stored vulnerability records and
	/// re-evaluates each one against the version currently installed, so a
	/// cached flag is never served against a stale version number. An empty
	/// cache defers to a full online pass.
	pub async fn reconcile_from_cache(
		&self,
		inventory: &[PluginInfo],
		notifier: &dyn Notifier,
	) -> Result<PassOutcome> {
		let mut reports = self
			.cache
			.read_all()
			.await
			.map_err(CheckerError::CacheUnavailable)?;

		if reports.is_empty() {
			info!("Cache is empty, running a full online reconciliation pass");
			return self.reconcile_fresh(inventory, false, notifier).await;
		}

		let live: HashMap<&str, &PluginInfo> = inventory
			.iter()
			.map(|plugin| (plugin.file_path.as_str(), plugin))
			.collect();

		for report in &mut reports {
			if let Some(plugin) = live.get(report.file_path.as_str()) {
				report.installed_version = plugin.installed_version.clone();
				report.evaluate();
			}
		}

		self.cache
			.write_all(&reports)
			.await
			.map_err(CheckerError::CacheUnavailable)?;

		let vulnerable = vulnerable_names(&reports);
		debug!(
			"Offline pass complete: {} plugins evaluated, {} vulnerable",
			reports.len(),
			vulnerable.len()
		);

		Ok(PassOutcome {
			reports,
			vulnerable,
			skipped: Vec::new(),
		})
	}

	async fn read_prior_reports(&self) -> Result<HashMap<String, PluginReport>> {
		let prior = self
			.cache
			.read_all()
			.await
			.map_err(CheckerError::CacheUnavailable)?;

		Ok(prior
			.into_iter()
			.map(|report| (report.file_path.clone(), report))
			.collect())
	}

	/// Builds one plugin's report for an online pass. Fresh feed records are
	/// merged into the previously cached list (deduplicated by title and fix
	/// version); on feed failure the cached records are kept as-is. Either
	/// way the vulnerability flag is recomputed against the version
	/// currently installed.
	async fn enrich_plugin(
		&self,
		plugin: &PluginInfo,
		prior: &HashMap<String, PluginReport>,
	) -> Result<PluginReport, CheckerError> {
		let key = plugin.lookup_key()?;

		let mut report = match prior.get(&plugin.file_path) {
			Some(previous) => {
				let mut report = previous.clone();
				report.name = plugin.name.clone();
				report.identifier = key.clone();
				report.installed_version = plugin.installed_version.clone();
				report
			}
			None => PluginReport::new(plugin, key.clone()),
		};

		match self.feed.fetch_records(&key).await {
			FeedLookup::Records(records) => {
				report.merge_records(records);
				report.last_checked = Some(Utc::now().naive_utc());
			}
			FeedLookup::Unavailable => {
				debug!(
					"Feed unavailable for '{}', keeping cached vulnerability data",
					key
				);
			}
		}

		report.evaluate();
		Ok(report)
	}
}

fn vulnerable_names(reports: &[PluginReport]) -> Vec<String> {
	reports
		.iter()
		.filter(|report| report.is_known_vulnerable)
		.map(|report| report.name.clone())
		.collect()
}
