// src/models/plugin.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::CheckerError;
use crate::models::vulnerability::VulnerabilityRecord;

/// A plugin as reported by the inventory provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
	pub name: String,
	/// Declared identifier (text domain / slug). May be missing; the lookup
	/// key is then derived from the file path.
	#[serde(default)]
	pub identifier: Option<String>,
	/// Unique inventory path, `<identifier>/<entry-file>` by convention.
	pub file_path: String,
	pub installed_version: String,
}

impl PluginInfo {
	/// Lookup key used against the vulnerability feed: the declared
	/// identifier when present, otherwise the leading segment of the file
	/// path. Resolution is idempotent.
	pub fn lookup_key(&self) -> Result<String, CheckerError> {
		if let Some(identifier) = &self.identifier {
			if !identifier.is_empty() {
				return Ok(identifier.clone());
			}
		}

		let segment = self.file_path.split('/').next().unwrap_or("");
		if segment.is_empty() {
			return Err(CheckerError::MissingIdentifier(self.name.clone()));
		}
		Ok(segment.to_string())
	}
}

/// A plugin enriched with vulnerability data. This is the shape persisted in
/// the cache and rendered by downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginReport {
	pub name: String,
	pub identifier: String,
	pub file_path: String,
	pub installed_version: String,
	/// Feed order preserved; entries are deduplicated by (title, fixed_in)
	/// when merging fresh feed results.
	#[serde(default)]
	pub vulnerabilities: Vec<VulnerabilityRecord>,
	#[serde(default)]
	pub is_known_vulnerable: bool,
	/// When the feed was last reached successfully for this plugin.
	#[serde(default)]
	pub last_checked: Option<NaiveDateTime>,
}

impl PluginReport {
	pub fn new(plugin: &PluginInfo, identifier: String) -> Self {
		Self {
			name: plugin.name.clone(),
			identifier,
			file_path: plugin.file_path.clone(),
			installed_version: plugin.installed_version.clone(),
			vulnerabilities: Vec::new(),
			is_known_vulnerable: false,
			last_checked: None,
		}
	}

	/// Appends records not already present, keeping feed order.
	pub fn merge_records(&mut self, records: Vec<VulnerabilityRecord>) {
		for record in records {
			if !self.vulnerabilities.contains(&record) {
				self.vulnerabilities.push(record);
			}
		}
	}

	/// Recomputes `is_known_vulnerable` against the currently installed
	/// version: an OR-reduction over all known records, so a single
	/// triggering record flags the plugin regardless of evaluation order.
	pub fn evaluate(&mut self) {
		self.is_known_vulnerable = self
			.vulnerabilities
			.iter()
			.any(|vuln| vuln.affects(&self.installed_version));
	}
}
