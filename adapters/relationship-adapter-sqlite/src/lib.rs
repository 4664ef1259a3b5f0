//! SQLite relationship store for Fleetward.
//!
//! Implements [`RelationshipAdapter`] on top of `sqlx`. Admissions and
//! transitions are expressed as single conditional statements; SQLite
//! serializes writers, so the capacity check and the status check always see
//! the state they modify.

mod client;
mod relationship;
mod schema;
mod utils;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use fleetward_types::prelude::*;
use fleetward_types::relationship_adapter::{
	Assignment, ClientEntry, ClientStatus, ListClientOptions, Relationship, RelationshipAdapter,
	Transition,
};

#[derive(Debug)]
pub struct RelationshipAdapterSqlite {
	db: SqlitePool,
}

impl RelationshipAdapterSqlite {
	/// Opens (or creates) `relationship.db` inside `path`
	pub async fn new(path: impl AsRef<Path>) -> FwResult<Self> {
		tokio::fs::create_dir_all(path.as_ref()).await?;
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref().join("relationship.db"))
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| warn!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| warn!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl RelationshipAdapter for RelationshipAdapterSqlite {
	// Relationship records
	//**********************
	async fn read_relationship(&self, manager_id: &AccountId) -> FwResult<Relationship> {
		relationship::read(&self.db, manager_id).await
	}

	async fn ensure_relationship(
		&self,
		manager_id: &AccountId,
		default_limit: u32,
	) -> FwResult<Relationship> {
		relationship::ensure(&self.db, manager_id, default_limit).await
	}

	async fn update_client_limit(&self, manager_id: &AccountId, limit: u32) -> FwResult<()> {
		relationship::update_limit(&self.db, manager_id, limit).await
	}

	// Client entries
	//****************
	async fn read_client(
		&self,
		manager_id: &AccountId,
		client_id: &AccountId,
	) -> FwResult<ClientEntry> {
		client::read(&self.db, manager_id, client_id).await
	}

	async fn find_assignment(&self, client_id: &AccountId) -> FwResult<Option<Assignment>> {
		client::find_assignment(&self.db, client_id).await
	}

	async fn list_clients(
		&self,
		manager_id: &AccountId,
		opts: &ListClientOptions<'_>,
	) -> FwResult<Vec<ClientEntry>> {
		client::list(&self.db, manager_id, opts).await
	}

	async fn admit_client(
		&self,
		manager_id: &AccountId,
		client_id: &AccountId,
		status: ClientStatus,
		now: Timestamp,
	) -> FwResult<ClientEntry> {
		if !matches!(status, ClientStatus::Pending | ClientStatus::Approved) {
			return Err(Error::Internal(format!("cannot admit a client as {}", status)));
		}
		client::admit(&self.db, manager_id, client_id, status, now).await
	}

	async fn transition_client(&self, transition: Transition<'_>) -> FwResult<ClientEntry> {
		client::transition(&self.db, transition).await
	}
}

// vim: ts=4
