//! Test app builders and helpers
//!
//! Every test gets its own SQLite databases in a `TempDir`, returned inside
//! [`TestEnv`] so cleanup happens when the test ends.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use fleetward_account_adapter_sqlite::AccountAdapterSqlite;
use fleetward_core::settings::CoreSettings;
use fleetward_core::{Adapters, App, AppState};
use fleetward_relationship_adapter_sqlite::RelationshipAdapterSqlite;
use fleetward_types::account_directory::{
	AccessToken, Account, AccountDirectory, AuthCtx, CreateAccountData, ManagerInfo,
};
use fleetward_types::notify_adapter::{CredentialNotice, Notifier};
use fleetward_types::prelude::*;

/// Initialize a tracing subscriber writing to the test output
pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
		.try_init();
}

// Notifiers //
//***********//
/// Keeps every notice it receives
#[derive(Debug, Default)]
pub struct RecordingNotifier {
	pub notices: Mutex<Vec<CredentialNotice>>,
}

impl RecordingNotifier {
	pub fn notices(&self) -> Vec<CredentialNotice> {
		self.notices.lock().unwrap().clone()
	}

	/// Waits until `count` notices arrived; delivery runs on a spawned task
	pub async fn wait_for(&self, count: usize) -> Vec<CredentialNotice> {
		for _ in 0..200 {
			let notices = self.notices();
			if notices.len() >= count {
				return notices;
			}
			tokio::time::sleep(Duration::from_millis(10)).await;
		}
		self.notices()
	}
}

#[async_trait]
impl Notifier for RecordingNotifier {
	async fn send_credentials(&self, notice: &CredentialNotice) -> FwResult<()> {
		self.notices.lock().unwrap().push(notice.clone());
		Ok(())
	}
}

/// Always fails to deliver
#[derive(Debug, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
	async fn send_credentials(&self, _notice: &CredentialNotice) -> FwResult<()> {
		Err(Error::Internal("mail relay down".into()))
	}
}

// Directory wrapper //
//*******************//
/// Delegates to the real directory but refuses to provision accounts
#[derive(Debug)]
pub struct FailingProvisioning(pub Arc<AccountAdapterSqlite>);

#[async_trait]
impl AccountDirectory for FailingProvisioning {
	async fn read_account(&self, id: &AccountId) -> FwResult<Account> {
		self.0.read_account(id).await
	}

	async fn read_role(&self, id: &AccountId) -> FwResult<AccountRole> {
		self.0.read_role(id).await
	}

	async fn create_account(&self, _data: CreateAccountData<'_>) -> FwResult<AccountId> {
		Err(Error::Internal("provisioning unavailable".into()))
	}

	async fn delete_account(&self, id: &AccountId) -> FwResult<()> {
		self.0.delete_account(id).await
	}

	async fn list_active_managers(&self) -> FwResult<Vec<ManagerInfo>> {
		self.0.list_active_managers().await
	}

	async fn check_password(&self, email: &str, password: &str) -> FwResult<AuthCtx> {
		self.0.check_password(email, password).await
	}

	async fn create_access_token(&self, id: &AccountId, ttl_secs: i64) -> FwResult<AccessToken> {
		self.0.create_access_token(id, ttl_secs).await
	}

	async fn validate_access_token(&self, token: &str) -> FwResult<AuthCtx> {
		self.0.validate_access_token(token).await
	}
}

// TestEnv //
//*********//
pub struct TestEnv {
	pub app: App,
	pub accounts: Arc<AccountAdapterSqlite>,
	pub relationships: Arc<RelationshipAdapterSqlite>,
	pub notifier: Arc<RecordingNotifier>,
	_tmp: TempDir,
}

/// Options for building a test app
#[derive(Default)]
pub struct TestOpts {
	pub settings: CoreSettings,
	pub failing_provisioning: bool,
	pub failing_notifier: bool,
}

pub async fn create_test_env() -> TestEnv {
	create_test_env_with(TestOpts::default()).await
}

pub async fn create_test_env_with(opts: TestOpts) -> TestEnv {
	let tmp = TempDir::new().expect("Failed to create temp directory");
	let accounts = Arc::new(
		AccountAdapterSqlite::new(tmp.path()).await.expect("Failed to create account adapter"),
	);
	let relationships = Arc::new(
		RelationshipAdapterSqlite::new(tmp.path())
			.await
			.expect("Failed to create relationship adapter"),
	);
	let notifier = Arc::new(RecordingNotifier::default());

	let account_directory: Arc<dyn AccountDirectory> = if opts.failing_provisioning {
		Arc::new(FailingProvisioning(accounts.clone()))
	} else {
		accounts.clone()
	};
	let app_notifier: Arc<dyn Notifier> =
		if opts.failing_notifier { Arc::new(FailingNotifier) } else { notifier.clone() };

	let app = AppState::build(
		Adapters {
			relationship_adapter: relationships.clone(),
			account_directory,
			notifier: app_notifier,
		},
		opts.settings,
	)
	.expect("Failed to build app");

	TestEnv { app, accounts, relationships, notifier, _tmp: tmp }
}

impl TestEnv {
	async fn create_account(&self, name: &str, role: AccountRole, admin: bool) -> AuthCtx {
		let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
		let account_id = self
			.accounts
			.create_account(CreateAccountData {
				name,
				email: &email,
				password: "test_password_123",
				role,
				admin,
			})
			.await
			.expect("Failed to create account");
		AuthCtx { account_id, role, admin }
	}

	pub async fn manager(&self, name: &str) -> AuthCtx {
		self.create_account(name, AccountRole::Manager, false).await
	}

	pub async fn standalone(&self, name: &str) -> AuthCtx {
		self.create_account(name, AccountRole::Standalone, false).await
	}

	pub async fn admin(&self) -> AuthCtx {
		self.create_account("Site Admin", AccountRole::Manager, true).await
	}
}

// vim: ts=4
