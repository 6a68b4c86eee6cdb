// src/inventory.rs

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::plugin::PluginInfo;

/// Source of the installed-plugin inventory. External collaborator; the
/// engine only ever asks for the full current list.
pub trait InventoryProvider: Send + Sync {
	fn list_installed(&self) -> Result<Vec<PluginInfo>>;
}

/// Reads the inventory from a JSON manifest: an array of plugin entries with
/// `name`, optional `identifier`, `file_path` and `installed_version`.
pub struct JsonFileInventory {
	path: PathBuf,
}

impl JsonFileInventory {
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}
}

impl InventoryProvider for JsonFileInventory {
	fn list_installed(&self) -> Result<Vec<PluginInfo>> {
		let data = std::fs::read_to_string(&self.path)
			.with_context(|| format!("Failed to read plugin manifest at {:?}", self.path))?;
		serde_json::from_str(&data).context("Failed to parse plugin manifest")
	}
}
