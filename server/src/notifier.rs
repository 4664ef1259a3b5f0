//! Notifier that only records credential issuance in the log

use async_trait::async_trait;

use crate::prelude::*;
use fleetward_types::notify_adapter::{CredentialNotice, Notifier};

/// Logs who received credentials. The password itself is never written out.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
	async fn send_credentials(&self, notice: &CredentialNotice) -> FwResult<()> {
		info!(
			account = %notice.account_id,
			manager = %notice.manager_id,
			email = %notice.email,
			"credentials issued for {}",
			notice.name
		);
		Ok(())
	}
}

// vim: ts=4
