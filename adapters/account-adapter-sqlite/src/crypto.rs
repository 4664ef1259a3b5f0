//! Password hashing
//!
//! bcrypt is CPU bound, so hashing and verification run on the blocking pool.

use fleetward_types::prelude::*;

const BCRYPT_COST: u32 = 10;

fn generate_password_hash_sync(password: &str) -> FwResult<Box<str>> {
	let hash = bcrypt::hash(password, BCRYPT_COST)
		.map_err(|err| Error::Internal(format!("password hashing failed: {}", err)))?;

	Ok(hash.into())
}

pub(crate) async fn generate_password_hash(password: Box<str>) -> FwResult<Box<str>> {
	tokio::task::spawn_blocking(move || generate_password_hash_sync(&password))
		.await
		.map_err(|_| Error::Internal("password hashing task failed".into()))?
}

fn check_password_sync(password: &str, password_hash: &str) -> FwResult<()> {
	let res = bcrypt::verify(password, password_hash).map_err(|_| Error::Unauthorized)?;
	if res { Ok(()) } else { Err(Error::Unauthorized) }
}

pub(crate) async fn check_password(password: Box<str>, password_hash: Box<str>) -> FwResult<()> {
	tokio::task::spawn_blocking(move || check_password_sync(&password, &password_hash))
		.await
		.map_err(|_| Error::Internal("password check task failed".into()))?
}

// vim: ts=4
