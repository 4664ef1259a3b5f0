//! Site administration endpoints

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::prelude::*;
use fleetward_core::extract::Auth;
use fleetward_types::account_directory::{Account, CreateAccountData};
use fleetward_types::types::ApiResponse;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct CreateAccountReq {
	name: String,
	email: String,
	password: String,
	role: AccountRole,
	#[serde(default)]
	admin: bool,
}

/// # POST /api/admin/accounts
pub async fn post_account(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<CreateAccountReq>,
) -> FwResult<(StatusCode, Json<ApiResponse<Account>>)> {
	if req.name.trim().is_empty() {
		return Err(Error::ValidationError("name must not be empty".into()));
	}
	if req.password.chars().count() < MIN_PASSWORD_LENGTH {
		return Err(Error::ValidationError("password too short".into()));
	}

	let account_id = app
		.account_directory
		.create_account(CreateAccountData {
			name: &req.name,
			email: &req.email,
			password: &req.password,
			role: req.role,
			admin: req.admin,
		})
		.await?;
	info!(admin = %auth.account_id, account = %account_id, role = %req.role, "account created");

	let account = app.account_directory.read_account(&account_id).await?;
	Ok((StatusCode::CREATED, Json(ApiResponse::new(account))))
}

// vim: ts=4
