//! Opaque access tokens

use sqlx::SqlitePool;

use crate::utils::*;
use fleetward_types::account_directory::{AccessToken, AuthCtx};
use fleetward_types::prelude::*;
use fleetward_types::utils::random_id;

/// Issue a new token for an active account
pub(crate) async fn create(
	db: &SqlitePool,
	id: &AccountId,
	ttl_secs: i64,
) -> FwResult<AccessToken> {
	let role = crate::account::read_role(db, id).await?;
	let token: Box<str> = format!("{}{}", random_id(), random_id()).into();
	let expires_at = Timestamp::now().add_seconds(ttl_secs);

	// Drop this account's expired tokens while we are here
	sqlx::query("DELETE FROM access_tokens WHERE account_id = ?1 AND expires_at <= ?2")
		.bind(id.as_str())
		.bind(Timestamp::now().0)
		.execute(db)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;

	sqlx::query("INSERT INTO access_tokens (token, account_id, expires_at) VALUES (?1, ?2, ?3)")
		.bind(token.as_ref())
		.bind(id.as_str())
		.bind(expires_at.0)
		.execute(db)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;

	debug!(account = %id, "access token issued");
	Ok(AccessToken { token, account_id: id.clone(), role, expires_at })
}

/// Resolve a token of an active account, `Unauthorized` if unknown or expired
pub(crate) async fn validate(db: &SqlitePool, token: &str) -> FwResult<AuthCtx> {
	let res = sqlx::query(
		"SELECT a.account_id, a.role, a.admin FROM access_tokens t
		JOIN accounts a ON a.account_id = t.account_id
		WHERE t.token = ?1 AND t.expires_at > ?2 AND a.status = 'A'",
	)
	.bind(token)
	.bind(Timestamp::now().0)
	.fetch_one(db)
	.await;

	match map_res(res, row_to_auth_ctx) {
		Err(Error::NotFound) => Err(Error::Unauthorized),
		res => res,
	}
}

// vim: ts=4
