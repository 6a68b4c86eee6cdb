use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn create_tables(conn: &Connection) -> Result<()> {
	conn.execute_batch(
		"
		CREATE TABLE IF NOT EXISTS plugin_reports (
			file_path TEXT PRIMARY KEY,
			report TEXT NOT NULL
		);
		",
	)
	.context("Failed to create tables")?;

	Ok(())
}
