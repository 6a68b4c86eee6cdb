// src/main.rs

mod config;
mod db;
mod engine;
mod error;
mod inventory;
mod models;
mod repositories;
mod utils;

use anyhow::{Context, Result};
use config::Settings;
use db::connection::{self, SqlitePool};
use db::schema;
use engine::alert::{LogNotifier, Notifier};
use engine::reconciler::Reconciler;
use inventory::{InventoryProvider, JsonFileInventory};
use log::{error, info};
use repositories::cache_repo::CacheRepository;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{sleep, Duration};
use utils::feed_api::FeedClient;

/// Legacy cadence: one online reconciliation pass twice a day.
const PASS_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

struct App {
	pool: Arc<SqlitePool>,
	reconciler: Reconciler<FeedClient>,
	inventory: Arc<dyn InventoryProvider>,
	notifier: Arc<dyn Notifier>,
	shutdown_signal: tokio::sync::broadcast::Sender<()>,
}

impl App {
	fn new() -> Result<Self> {
		utils::logger::init();
		info!("Starting Plugin Vulnerability Checker");

		let settings = Settings::from_env();
		let (shutdown_tx, _) = tokio::sync::broadcast::channel(1);

		let pool = Arc::new(
			connection::establish_pool(&settings.database_path)
				.context("Failed to establish database connection pool")?,
		);

		let feed = FeedClient::new(&settings).context("Failed to create feed client")?;
		let cache = CacheRepository::new(pool.clone());
		let inventory: Arc<dyn InventoryProvider> =
			Arc::new(JsonFileInventory::new(settings.manifest_path.clone()));

		info!("Database connection pool and feed client established");

		Ok(App {
			pool,
			reconciler: Reconciler::new(feed, cache, settings),
			inventory,
			notifier: Arc::new(LogNotifier),
			shutdown_signal: shutdown_tx,
		})
	}

	fn init_database(&self) -> Result<()> {
		let conn = self.pool.get().context("Failed to get database connection")?;
		schema::create_tables(&conn).context("Failed to create database tables")?;
		info!("Database tables initialized successfully");
		Ok(())
	}

	/// Startup pass. The first pass after activation runs silent so initial
	/// setup never alerts; afterwards cached data is re-evaluated against
	/// the live inventory without touching the network.
	async fn run_startup_pass(&self) -> Result<()> {
		let plugins = self
			.inventory
			.list_installed()
			.context("Failed to list installed plugins")?;

		let cache = CacheRepository::new(self.pool.clone());
		let cached = cache.read_all().await?;

		let outcome = if cached.is_empty() {
			info!("Cache not yet initialized, running silent online pass");
			self.reconciler
				.reconcile_fresh(&plugins, true, &*self.notifier)
				.await?
		} else {
			self.reconciler
				.reconcile_from_cache(&plugins, &*self.notifier)
				.await?
		};

		info!(
			"Startup pass finished: {} plugins, {} vulnerable",
			outcome.reports.len(),
			outcome.vulnerable.len()
		);
		Ok(())
	}

	fn start_pass_scheduler(&self) {
		let reconciler = self.reconciler.clone();
		let inventory = self.inventory.clone();
		let notifier = self.notifier.clone();
		let mut shutdown_rx = self.shutdown_signal.subscribe();

		tokio::spawn(async move {
			loop {
				tokio::select! {
					_ = sleep(PASS_INTERVAL) => {
						let plugins = match inventory.list_installed() {
							Ok(plugins) => plugins,
							Err(e) => {
								error!("Scheduled pass could not read inventory: {}", e);
								continue;
							}
						};
						match reconciler.reconcile_fresh(&plugins, false, &*notifier).await {
							Ok(outcome) => info!(
								"Scheduled pass completed: {} plugins checked, {} vulnerable",
								outcome.reports.len(),
								outcome.vulnerable.len()
							),
							Err(e) => error!("Scheduled pass failed: {}", e),
						}
					}
					_ = shutdown_rx.recv() => {
						info!("Pass scheduler received shutdown signal");
						break;
					}
				}
			}
		});
	}

	async fn run(&self) -> Result<()> {
		self.init_database()?;

		if let Err(e) = self.run_startup_pass().await {
			error!("Startup pass failed: {}", e);
		}

		self.start_pass_scheduler();

		let mut shutdown_rx = self.shutdown_signal.subscribe();
		let shutdown_signal = self.shutdown_signal.clone();
		tokio::spawn(async move {
			match signal::ctrl_c().await {
				Ok(()) => {
					info!("Received Ctrl+C signal");
					let _ = shutdown_signal.send(());
				}
				Err(err) => {
					error!("Failed to listen for ctrl-c signal: {}", err);
				}
			}
		});

		let _ = shutdown_rx.recv().await;
		info!("Received shutdown signal, closing application");

		self.cleanup().await;
		Ok(())
	}

	/// Deactivation-equivalent teardown: drops every cached report and
	/// exits without running a pass.
	async fn teardown(&self) -> Result<()> {
		self.init_database()?;
		CacheRepository::new(self.pool.clone()).clear().await?;
		info!("Plugin cache cleared");
		Ok(())
	}

	async fn cleanup(&self) {
		info!("Stopping background tasks...");
		let _ = self.shutdown_signal.send(());
		sleep(Duration::from_secs(1)).await;
		info!("Cleanup completed");
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let app = App::new()?;

	if std::env::args().any(|arg| arg == "--teardown") {
		return app.teardown().await;
	}

	app.run().await
}
