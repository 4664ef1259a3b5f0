//! Adapter that resolves accounts, their roles and their credentials.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

use crate::prelude::*;

/// Account as seen by the relationship core
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
	pub id: AccountId,
	pub name: Box<str>,
	pub email: Box<str>,
	pub role: AccountRole,
	/// Site administrator flag
	pub admin: bool,
	pub active: bool,
	pub created_at: Timestamp,
}

/// Manager listing item
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerInfo {
	pub id: AccountId,
	pub name: Box<str>,
}

/// Data needed to provision a new account
#[derive(Debug)]
pub struct CreateAccountData<'a> {
	pub name: &'a str,
	pub email: &'a str,
	pub password: &'a str,
	pub role: AccountRole,
	pub admin: bool,
}

/// Context struct for an authenticated account
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub account_id: AccountId,
	pub role: AccountRole,
	pub admin: bool,
}

/// Issued access token
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
	pub token: Box<str>,
	pub account_id: AccountId,
	pub role: AccountRole,
	pub expires_at: Timestamp,
}

#[async_trait]
pub trait AccountDirectory: Debug + Send + Sync {
	async fn read_account(&self, id: &AccountId) -> FwResult<Account>;

	/// Resolves an account's role, `NotFound` for unknown or inactive accounts
	async fn read_role(&self, id: &AccountId) -> FwResult<AccountRole>;

	/// Provisions a new account, returning its generated id
	async fn create_account(&self, data: CreateAccountData<'_>) -> FwResult<AccountId>;

	/// Removes an account that was provisioned but never admitted
	async fn delete_account(&self, id: &AccountId) -> FwResult<()>;

	async fn list_active_managers(&self) -> FwResult<Vec<ManagerInfo>>;

	/// Verifies login credentials
	async fn check_password(&self, email: &str, password: &str) -> FwResult<AuthCtx>;

	async fn create_access_token(&self, id: &AccountId, ttl_secs: i64) -> FwResult<AccessToken>;

	async fn validate_access_token(&self, token: &str) -> FwResult<AuthCtx>;
}

// vim: ts=4
