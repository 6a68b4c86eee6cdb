use anyhow::{Context, Result};
use log::info;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

pub type SqlitePool = Pool<SqliteConnectionManager>;

/// Establishes a connection pool backed by the given database file, creating
/// the parent directory if needed.
pub fn establish_pool(db_path: &Path) -> Result<SqlitePool> {
	info!("SQLite cache will be located at: {:?}", db_path);

	if let Some(parent) = db_path.parent() {
		if !parent.as_os_str().is_empty() {
			std::fs::create_dir_all(parent).context("Failed to create database directory")?;
		}
	}

	let manager = SqliteConnectionManager::file(db_path);

	let pool = Pool::builder()
		.max_size(8)
		.build(manager)
		.context("Failed to create SQLite connection pool")?;

	Ok(pool)
}
