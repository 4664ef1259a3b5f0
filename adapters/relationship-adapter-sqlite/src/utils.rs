//! Shared utilities for the SQLite relationship store

use sqlx::{Row, sqlite::SqliteRow};

use fleetward_types::prelude::*;
use fleetward_types::relationship_adapter::{ClientEntry, ClientStatus};

/// Columns selected for a client entry
pub(crate) const ENTRY_COLUMNS: &str = "entry_id, client_id, status, requested_at, approved_at";

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Translate an SQL error, unique violations meaning the client is already live elsewhere
pub(crate) fn map_write_err(err: sqlx::Error) -> Error {
	match &err {
		sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Error::AlreadyAssigned,
		_ => {
			inspect(&err);
			Error::DbError
		}
	}
}

/// Map a single-row query result, translating SQL errors to FwResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> FwResult<T>
where
	F: FnOnce(SqliteRow) -> FwResult<T>,
{
	match row {
		Ok(row) => f(row),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

pub(crate) fn parse_status(code: &str) -> FwResult<ClientStatus> {
	ClientStatus::from_code(code).ok_or_else(|| {
		warn!("DB: invalid client status code {:?}", code);
		Error::DbError
	})
}

pub(crate) fn read_limit(row: &SqliteRow, column: &str) -> FwResult<u32> {
	let limit: i64 = row.try_get(column).inspect_err(inspect).map_err(|_| Error::DbError)?;
	u32::try_from(limit).map_err(|_| Error::DbError)
}

/// Build a client entry from a row selected with `ENTRY_COLUMNS`
pub(crate) fn row_to_entry(row: &SqliteRow) -> FwResult<ClientEntry> {
	let get = |err: sqlx::Error| {
		inspect(&err);
		Error::DbError
	};
	let status: String = row.try_get("status").map_err(get)?;
	let client_id: String = row.try_get("client_id").map_err(get)?;
	Ok(ClientEntry {
		entry_id: row.try_get("entry_id").map_err(get)?,
		client_id: AccountId::from(client_id),
		status: parse_status(&status)?,
		requested_at: row.try_get("requested_at").map(Timestamp).map_err(get)?,
		approved_at: row.try_get::<Option<i64>, _>("approved_at").map_err(get)?.map(Timestamp),
	})
}

/// Collect rows into client entries
pub(crate) fn collect_entries(rows: &[SqliteRow]) -> FwResult<Vec<ClientEntry>> {
	rows.iter().map(row_to_entry).collect()
}

// vim: ts=4
