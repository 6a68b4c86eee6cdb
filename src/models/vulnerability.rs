// src/models/vulnerability.rs

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::utils::version;

/// A single disclosed vulnerability as reported by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityRecord {
	pub title: String,
	/// Version the vulnerability was fixed in. `None` means no fix has been
	/// published, which flags the plugin regardless of installed version.
	pub fixed_in: Option<String>,
}

impl VulnerabilityRecord {
	pub fn affects(&self, installed_version: &str) -> bool {
		match &self.fixed_in {
			None => true,
			Some(fixed) => version::compare(fixed, installed_version) == Ordering::Greater,
		}
	}
}
