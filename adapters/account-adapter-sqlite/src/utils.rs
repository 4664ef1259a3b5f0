//! Utility functions for database operations

use sqlx::{Row, sqlite::SqliteRow};

use fleetward_types::account_directory::AuthCtx;
use fleetward_types::prelude::*;

/// Log database errors
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a query result to a value using a closure
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> FwResult<T>
where
	F: FnOnce(&SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(ref row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

pub(crate) fn parse_role(code: &str) -> Result<AccountRole, sqlx::Error> {
	AccountRole::from_code(code)
		.ok_or_else(|| sqlx::Error::Decode(format!("invalid role code {:?}", code).into()))
}

/// Build an auth context from a row with `account_id`, `role` and `admin`
pub(crate) fn row_to_auth_ctx(row: &SqliteRow) -> Result<AuthCtx, sqlx::Error> {
	let id: String = row.try_get("account_id")?;
	let role: String = row.try_get("role")?;
	Ok(AuthCtx {
		account_id: AccountId::from(id),
		role: parse_role(&role)?,
		admin: row.try_get("admin")?,
	})
}

// vim: ts=4
