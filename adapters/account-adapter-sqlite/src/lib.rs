//! SQLite account directory for Fleetward.
//!
//! Stores accounts with their role, site administrator flag and bcrypt
//! password hash, and issues opaque bearer tokens.

mod account;
mod crypto;
mod schema;
mod token;
mod utils;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use fleetward_types::account_directory::{
	AccessToken, Account, AccountDirectory, AuthCtx, CreateAccountData, ManagerInfo,
};
use fleetward_types::prelude::*;

#[derive(Debug)]
pub struct AccountAdapterSqlite {
	db: SqlitePool,
}

impl AccountAdapterSqlite {
	/// Opens (or creates) `account.db` inside `path`
	pub async fn new(path: impl AsRef<Path>) -> FwResult<Self> {
		tokio::fs::create_dir_all(path.as_ref()).await?;
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref().join("account.db"))
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
impl AccountDirectory for AccountAdapterSqlite {
	async fn read_account(&self, id: &AccountId) -> FwResult<Account> {
		account::read(&self.db, id).await
	}

	async fn read_role(&self, id: &AccountId) -> FwResult<AccountRole> {
		account::read_role(&self.db, id).await
	}

	async fn create_account(&self, data: CreateAccountData<'_>) -> FwResult<AccountId> {
		account::create(&self.db, data).await
	}

	async fn delete_account(&self, id: &AccountId) -> FwResult<()> {
		account::delete(&self.db, id).await
	}

	async fn list_active_managers(&self) -> FwResult<Vec<ManagerInfo>> {
		account::list_active_managers(&self.db).await
	}

	async fn check_password(&self, email: &str, password: &str) -> FwResult<AuthCtx> {
		account::check_password(&self.db, email, password).await
	}

	async fn create_access_token(&self, id: &AccountId, ttl_secs: i64) -> FwResult<AccessToken> {
		token::create(&self.db, id, ttl_secs).await
	}

	async fn validate_access_token(&self, token: &str) -> FwResult<AuthCtx> {
		token::validate(&self.db, token).await
	}
}

// vim: ts=4
