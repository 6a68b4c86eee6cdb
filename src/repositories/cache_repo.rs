// src/repositories/cache_repo.rs

use crate::db::connection::SqlitePool;
use crate::models::plugin::PluginReport;
use anyhow::{Context, Result};
use log::warn;
use rusqlite::params;
use std::sync::Arc;
use tokio::task;

/// Durable mapping from plugin file path to its last-known enriched report,
/// stored as JSON. No TTL is enforced here; staleness is governed entirely by
/// which reconciliation mode the caller runs and by the scheduler cadence.
#[derive(Clone)]
pub struct CacheRepository {
	pool: Arc<SqlitePool>,
}

impl CacheRepository {
	pub fn new(pool: Arc<SqlitePool>) -> Self {
		Self { pool }
	}

	/// Reads every cached report. An empty result means the cache has never
	/// been populated; the caller is expected to run an online pass first.
	pub async fn read_all(&self) -> Result<Vec<PluginReport>> {
		let pool = self.pool.clone();

		task::spawn_blocking(move || -> Result<_> {
			let conn = pool.get().context("Failed to get database connection")?;

			let mut stmt = conn
				.prepare("SELECT report FROM plugin_reports ORDER BY file_path")
				.context("Failed to prepare statement")?;

			let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

			let mut reports = Vec::new();
			for row in rows {
				let json = row?;
				match serde_json::from_str::<PluginReport>(&json) {
					Ok(report) => reports.push(report),
					Err(e) => warn!("Dropping unreadable cache entry: {}", e),
				}
			}

			Ok(reports)
		})
		.await
		.context("Failed to execute database operation")?
	}

	/// Replaces the entire cached collection in one transaction, so a reader
	/// never observes a partially written pass.
	pub async fn write_all(&self, reports: &[PluginReport]) -> Result<()> {
		let pool = self.pool.clone();
		let reports = reports.to_vec();

		task::spawn_blocking(move || -> Result<()> {
			let mut conn = pool.get().context("Failed to get database connection")?;
			let tx = conn.transaction()?;

			tx.execute("DELETE FROM plugin_reports", [])?;

			{
				let mut stmt = tx
					.prepare("INSERT INTO plugin_reports (file_path, report) VALUES (?1, ?2)")
					.context("Failed to prepare statement")?;

				for report in &reports {
					let json = serde_json::to_string(report)
						.context("Failed to serialize plugin report")?;
					stmt.execute(params![report.file_path, json])?;
				}
			}

			tx.commit().context("Failed to commit cache write")?;
			Ok(())
		})
		.await
		.context("Failed to execute database operation")?
	}

	/// Drops every cached report. Deactivation-equivalent teardown.
	pub async fn clear(&self) -> Result<()> {
		let pool = self.pool.clone();

		task::spawn_blocking(move || -> Result<()> {
			let conn = pool.get().context("Failed to get database connection")?;
			conn.execute("DELETE FROM plugin_reports", [])
				.context("Failed to clear plugin cache")?;
			Ok(())
		})
		.await
		.context("Failed to execute database operation")?
	}
}
