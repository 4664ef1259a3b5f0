//! Login endpoint

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::prelude::*;
use fleetward_types::types::ApiResponse;

/// Delay before answering a failed login
const LOGIN_FAILURE_DELAY: Duration = Duration::from_secs(1);

#[derive(Deserialize)]
pub struct LoginReq {
	email: String,
	password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Login {
	token: Box<str>,
	account_id: AccountId,
	role: AccountRole,
	admin: bool,
	expires_at: Timestamp,
}

/// # POST /api/auth/login
pub async fn post_login(
	State(app): State<App>,
	Json(login): Json<LoginReq>,
) -> FwResult<(StatusCode, Json<ApiResponse<Login>>)> {
	let auth = match app.account_directory.check_password(&login.email, &login.password).await {
		Ok(auth) => auth,
		Err(Error::Unauthorized) => {
			tokio::time::sleep(LOGIN_FAILURE_DELAY).await;
			return Err(Error::Unauthorized);
		}
		Err(err) => return Err(err),
	};

	let token =
		app.account_directory.create_access_token(&auth.account_id, app.settings.token_ttl_secs).await?;
	info!(account = %auth.account_id, role = %auth.role, "login");

	Ok((
		StatusCode::OK,
		Json(ApiResponse::new(Login {
			token: token.token,
			account_id: auth.account_id,
			role: auth.role,
			admin: auth.admin,
			expires_at: token.expires_at,
		})),
	))
}

// vim: ts=4
