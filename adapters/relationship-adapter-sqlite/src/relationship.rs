//! Relationship record operations
//!
//! One record per manager: the client limit and the manager's entries.

use sqlx::{Row, SqlitePool};

use crate::utils::*;
use fleetward_types::prelude::*;
use fleetward_types::relationship_adapter::Relationship;

/// Read a relationship with all its entries in creation order
pub(crate) async fn read(db: &SqlitePool, manager_id: &AccountId) -> FwResult<Relationship> {
	// Both reads see the same snapshot
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	let res = sqlx::query(
		"SELECT client_limit, created_at FROM relationships WHERE manager_id = ?1",
	)
	.bind(manager_id.as_str())
	.fetch_one(&mut *tx)
	.await;

	let (client_limit, created_at) = map_res(res, |row| {
		let created_at: i64 =
			row.try_get("created_at").inspect_err(inspect).map_err(|_| Error::DbError)?;
		Ok((read_limit(&row, "client_limit")?, Timestamp(created_at)))
	})?;

	let rows = sqlx::query(&format!(
		"SELECT {} FROM relationship_clients WHERE manager_id = ?1 ORDER BY entry_id",
		ENTRY_COLUMNS
	))
	.bind(manager_id.as_str())
	.fetch_all(&mut *tx)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	Ok(Relationship {
		manager_id: manager_id.clone(),
		client_limit,
		clients: collect_entries(&rows)?,
		created_at,
	})
}

/// Create the relationship record if missing
pub(crate) async fn ensure(
	db: &SqlitePool,
	manager_id: &AccountId,
	default_limit: u32,
) -> FwResult<Relationship> {
	let res = sqlx::query(
		"INSERT OR IGNORE INTO relationships (manager_id, client_limit, created_at)
		VALUES (?1, ?2, ?3)",
	)
	.bind(manager_id.as_str())
	.bind(i64::from(default_limit))
	.bind(Timestamp::now().0)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	if res.rows_affected() > 0 {
		info!(manager = %manager_id, limit = default_limit, "Relationship created");
	}

	read(db, manager_id).await
}

/// Set the client limit. Entries are not touched, members above the new limit stay.
pub(crate) async fn update_limit(
	db: &SqlitePool,
	manager_id: &AccountId,
	limit: u32,
) -> FwResult<()> {
	sqlx::query(
		"INSERT INTO relationships (manager_id, client_limit, created_at) VALUES (?1, ?2, ?3)
		ON CONFLICT(manager_id) DO UPDATE SET client_limit = excluded.client_limit",
	)
	.bind(manager_id.as_str())
	.bind(i64::from(limit))
	.bind(Timestamp::now().0)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	Ok(())
}

/// Active count and limit of a manager, used to explain a refused admission
pub(crate) async fn read_capacity(db: &SqlitePool, manager_id: &AccountId) -> FwResult<(u32, u32)> {
	let res = sqlx::query(
		"SELECT r.client_limit,
			(SELECT count(*) FROM relationship_clients c
				WHERE c.manager_id = r.manager_id AND c.status != 'R') AS active
		FROM relationships r WHERE r.manager_id = ?1",
	)
	.bind(manager_id.as_str())
	.fetch_one(db)
	.await;

	map_res(res, |row| Ok((read_limit(&row, "client_limit")?, read_limit(&row, "active")?)))
}

// vim: ts=4
