//! Startup provisioning

use crate::config::AdminBootstrap;
use crate::prelude::*;
use fleetward_types::account_directory::CreateAccountData;

/// Creates the configured site administrator unless the email is already registered
pub async fn bootstrap(app: &App, admin: Option<&AdminBootstrap>) -> FwResult<()> {
	let Some(admin) = admin else {
		debug!("no admin account configured");
		return Ok(());
	};

	let res = app
		.account_directory
		.create_account(CreateAccountData {
			name: &admin.name,
			email: &admin.email,
			password: &admin.password,
			role: AccountRole::Manager,
			admin: true,
		})
		.await;

	match res {
		Ok(account_id) => {
			info!(account = %account_id, email = %admin.email, "admin account created");
			Ok(())
		}
		// Registered on an earlier start
		Err(Error::ValidationError(msg)) if msg.starts_with("email already registered") => {
			info!(email = %admin.email, "admin account already present");
			Ok(())
		}
		Err(err) => Err(err),
	}
}

// vim: ts=4
