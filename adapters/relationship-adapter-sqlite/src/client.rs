//! Client entry operations
//!
//! Admissions and transitions are single conditional statements, so SQLite
//! evaluates the check and the write as one operation.

use sqlx::{Row, SqlitePool};

use crate::relationship;
use crate::utils::*;
use fleetward_types::prelude::*;
use fleetward_types::relationship_adapter::{
	ApprovedAt, Assignment, ClientEntry, ClientStatus, ListClientOptions, Transition,
};

/// Read one entry of a manager
pub(crate) async fn read(
	db: &SqlitePool,
	manager_id: &AccountId,
	client_id: &AccountId,
) -> FwResult<ClientEntry> {
	let res = sqlx::query(&format!(
		"SELECT {} FROM relationship_clients WHERE manager_id = ?1 AND client_id = ?2",
		ENTRY_COLUMNS
	))
	.bind(manager_id.as_str())
	.bind(client_id.as_str())
	.fetch_one(db)
	.await;

	map_res(res, |row| row_to_entry(&row))
}

/// Find the live entry of a client across all managers
pub(crate) async fn find_assignment(
	db: &SqlitePool,
	client_id: &AccountId,
) -> FwResult<Option<Assignment>> {
	let row = sqlx::query(&format!(
		"SELECT manager_id, {} FROM relationship_clients
		WHERE client_id = ?1 AND status != 'R' ORDER BY entry_id LIMIT 1",
		ENTRY_COLUMNS
	))
	.bind(client_id.as_str())
	.fetch_optional(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	match row {
		None => Ok(None),
		Some(row) => {
			let manager_id: String =
				row.try_get("manager_id").inspect_err(inspect).map_err(|_| Error::DbError)?;
			Ok(Some(Assignment { manager_id: AccountId::from(manager_id), entry: row_to_entry(&row)? }))
		}
	}
}

/// List entries of a manager, optionally filtered by status
pub(crate) async fn list(
	db: &SqlitePool,
	manager_id: &AccountId,
	opts: &ListClientOptions<'_>,
) -> FwResult<Vec<ClientEntry>> {
	let mut query = sqlx::QueryBuilder::new(format!(
		"SELECT {} FROM relationship_clients WHERE manager_id=",
		ENTRY_COLUMNS
	));
	query.push_bind(manager_id.as_str());

	if let Some(statuses) = opts.status {
		if statuses.is_empty() {
			return Ok(Vec::new());
		}
		query.push(" AND status IN (");
		let mut separated = query.separated(", ");
		for status in statuses {
			separated.push_bind(status.code());
		}
		separated.push_unseparated(")");
	}
	query.push(" ORDER BY entry_id");

	let rows = query.build().fetch_all(db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	collect_entries(&rows)
}

/// Insert a new entry or reset a revoked one, if the manager has a free slot.
///
/// The capacity check, the "not live here" check and the write are one
/// statement. The partial unique index on live entries rejects clients that
/// are live with another manager.
pub(crate) async fn admit(
	db: &SqlitePool,
	manager_id: &AccountId,
	client_id: &AccountId,
	status: ClientStatus,
	now: Timestamp,
) -> FwResult<ClientEntry> {
	let approved_at = (status == ClientStatus::Approved).then_some(now.0);

	let row = sqlx::query(&format!(
		"INSERT INTO relationship_clients (manager_id, client_id, status, requested_at, approved_at)
		SELECT ?1, ?2, ?3, ?4, ?5
		WHERE (SELECT count(*) FROM relationship_clients WHERE manager_id = ?1 AND status != 'R')
			< (SELECT client_limit FROM relationships WHERE manager_id = ?1)
		ON CONFLICT(manager_id, client_id) DO UPDATE
			SET status = excluded.status,
				requested_at = excluded.requested_at,
				approved_at = excluded.approved_at
			WHERE relationship_clients.status = 'R'
		RETURNING {}",
		ENTRY_COLUMNS
	))
	.bind(manager_id.as_str())
	.bind(client_id.as_str())
	.bind(status.code())
	.bind(now.0)
	.bind(approved_at)
	.fetch_optional(db)
	.await
	.map_err(map_write_err)?;

	if let Some(row) = row {
		return row_to_entry(&row);
	}

	// Nothing written: explain why
	match read(db, manager_id, client_id).await {
		Ok(entry) if entry.status.is_active() => return Err(Error::AlreadyAssigned),
		Ok(_) | Err(Error::NotFound) => {}
		Err(err) => return Err(err),
	}
	let (limit, current) = relationship::read_capacity(db, manager_id).await?;
	if current >= limit {
		Err(Error::CapacityExceeded { limit, current })
	} else {
		Err(Error::ConflictingWrite)
	}
}

/// Change the status of an entry only if it still has the expected one
pub(crate) async fn transition(db: &SqlitePool, tr: Transition<'_>) -> FwResult<ClientEntry> {
	let mut query = sqlx::QueryBuilder::new("UPDATE relationship_clients SET status=");
	query.push_bind(tr.to.code());
	match tr.approved_at {
		ApprovedAt::Keep => {}
		ApprovedAt::Set(ts) => {
			query.push(", approved_at=").push_bind(ts.0);
		}
		ApprovedAt::Clear => {
			query.push(", approved_at=NULL");
		}
	}
	query
		.push(" WHERE manager_id=")
		.push_bind(tr.manager_id.as_str())
		.push(" AND client_id=")
		.push_bind(tr.client_id.as_str())
		.push(" AND status=")
		.push_bind(tr.from.code())
		.push(" RETURNING ")
		.push(ENTRY_COLUMNS);

	let row = query.build().fetch_optional(db).await.map_err(map_write_err)?;

	match row {
		Some(row) => row_to_entry(&row),
		None => {
			// Lost the race, or the entry never existed
			read(db, tr.manager_id, tr.client_id).await?;
			Err(Error::ConflictingWrite)
		}
	}
}

// vim: ts=4
