//! Out-of-band delivery of account credentials.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

/// Credentials generated for a newly provisioned client
#[derive(Clone, Debug)]
pub struct CredentialNotice {
	pub account_id: AccountId,
	pub name: Box<str>,
	pub email: Box<str>,
	pub password: Box<str>,
	pub manager_id: AccountId,
}

#[async_trait]
pub trait Notifier: Debug + Send + Sync {
	/// Delivers generated credentials. Callers treat failures as non-fatal.
	async fn send_credentials(&self, notice: &CredentialNotice) -> FwResult<()>;
}

// vim: ts=4
