//! Database schema initialization

use sqlx::SqlitePool;

/// Initialize the account and token tables
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Accounts
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS accounts (
		account_id text NOT NULL,
		name text NOT NULL,
		email text NOT NULL,
		password text NOT NULL,
		role char(1) NOT NULL,		-- 'M' - Manager, 'S' - Standalone
		admin integer NOT NULL DEFAULT 0,
		status char(1) NOT NULL,	-- 'A' - Active, 'D' - Disabled
		created_at integer NOT NULL,
		PRIMARY KEY(account_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_email ON accounts(email)")
		.execute(&mut *tx)
		.await?;

	// Access tokens
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS access_tokens (
		token text NOT NULL,
		account_id text NOT NULL,
		expires_at integer NOT NULL,
		PRIMARY KEY(token)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_access_tokens_account ON access_tokens(account_id)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
