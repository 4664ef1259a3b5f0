//! Database schema initialization
//!
//! Creates the relationship tables and the indexes the store relies on for
//! its conditional writes.

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Relationships
	//***************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS relationships (
		manager_id text NOT NULL,
		client_limit integer NOT NULL,
		created_at integer NOT NULL,
		PRIMARY KEY(manager_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Client entries
	//****************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS relationship_clients (
		entry_id integer NOT NULL,
		manager_id text NOT NULL,
		client_id text NOT NULL,
		status char(1) NOT NULL,	-- 'P' - Pending, 'A' - Approved, 'L' - Leave requested,
									-- 'M' - reMoval requested, 'R' - Revoked
		requested_at integer NOT NULL,
		approved_at integer,
		PRIMARY KEY(entry_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_relationship_clients_manager_client
		ON relationship_clients(manager_id, client_id)",
	)
	.execute(&mut *tx)
	.await?;
	// A client can be live in at most one relationship system-wide
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_relationship_clients_live
		ON relationship_clients(client_id) WHERE status != 'R'",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
