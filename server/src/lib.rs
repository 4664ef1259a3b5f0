//! Fleetward server: wires the SQLite adapters into the relationship API.
//!
//! Configuration comes from `FW_*` environment variables, see [`config`].

#![forbid(unsafe_code)]

pub mod admin;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod notifier;
pub mod prelude;
pub mod routes;

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::prelude::*;
use fleetward_account_adapter_sqlite::AccountAdapterSqlite;
use fleetward_core::app::VERSION;
use fleetward_core::{Adapters, AppState};
use fleetward_relationship_adapter_sqlite::RelationshipAdapterSqlite;

/// Opens the adapters under the configured directory and builds the app state
pub async fn build_app(config: &ServerConfig) -> FwResult<App> {
	let relationship_adapter = Arc::new(RelationshipAdapterSqlite::new(&config.db_dir).await?);
	let account_directory = Arc::new(AccountAdapterSqlite::new(&config.db_dir).await?);

	AppState::build(
		Adapters {
			relationship_adapter,
			account_directory,
			notifier: Arc::new(notifier::LogNotifier),
		},
		config.settings.clone(),
	)
}

pub async fn run(config: ServerConfig) -> FwResult<()> {
	info!("Fleetward V{}", VERSION);
	info!(db_dir = %config.db_dir.display(), "opening databases");

	let app = build_app(&config).await?;
	bootstrap::bootstrap(&app, config.admin.as_ref()).await.inspect_err(|err| {
		error!("FATAL: Bootstrap failed: {}", err);
	})?;

	let router = routes::init(app);
	let listener = tokio::net::TcpListener::bind(config.listen.as_ref()).await?;
	info!("Listening on HTTP {}", config.listen);

	axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
	info!("shut down");
	Ok(())
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		warn!("failed to listen for shutdown signal: {}", err);
		std::future::pending::<()>().await;
	}
}

// vim: ts=4
