//! Account management operations

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::crypto;
use crate::utils::*;
use fleetward_types::account_directory::{Account, AuthCtx, CreateAccountData, ManagerInfo};
use fleetward_types::prelude::*;
use fleetward_types::utils::{random_id, validate_email};

const ACCOUNT_COLUMNS: &str = "account_id, name, email, role, admin, status, created_at";

fn row_to_account(row: &SqliteRow) -> Result<Account, sqlx::Error> {
	let id: String = row.try_get("account_id")?;
	let role: String = row.try_get("role")?;
	let status: String = row.try_get("status")?;
	Ok(Account {
		id: AccountId::from(id),
		name: row.try_get::<String, _>("name")?.into(),
		email: row.try_get::<String, _>("email")?.into(),
		role: parse_role(&role)?,
		admin: row.try_get("admin")?,
		active: status == "A",
		created_at: row.try_get("created_at").map(Timestamp)?,
	})
}

/// Read an account by id
pub(crate) async fn read(db: &SqlitePool, id: &AccountId) -> FwResult<Account> {
	let res =
		sqlx::query(&format!("SELECT {} FROM accounts WHERE account_id = ?1", ACCOUNT_COLUMNS))
			.bind(id.as_str())
			.fetch_one(db)
			.await;

	map_res(res, row_to_account)
}

/// Read the role of an active account
pub(crate) async fn read_role(db: &SqlitePool, id: &AccountId) -> FwResult<AccountRole> {
	let res = sqlx::query("SELECT role FROM accounts WHERE account_id = ?1 AND status = 'A'")
		.bind(id.as_str())
		.fetch_one(db)
		.await;

	map_res(res, |row| parse_role(&row.try_get::<String, _>("role")?))
}

/// Create a new active account with a hashed password
pub(crate) async fn create(db: &SqlitePool, data: CreateAccountData<'_>) -> FwResult<AccountId> {
	let name = data.name.trim();
	if name.is_empty() {
		return Err(Error::ValidationError("name must not be empty".into()));
	}
	let email = data.email.trim().to_lowercase();
	validate_email(&email)?;

	let password_hash = crypto::generate_password_hash(data.password.into()).await?;
	let id = AccountId::from(random_id());

	sqlx::query(
		"INSERT INTO accounts (account_id, name, email, password, role, admin, status, created_at)
		VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'A', ?7)",
	)
	.bind(id.as_str())
	.bind(name)
	.bind(&email)
	.bind(password_hash.as_ref())
	.bind(data.role.code())
	.bind(data.admin)
	.bind(Timestamp::now().0)
	.execute(db)
	.await
	.map_err(|err| match &err {
		sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
			Error::ValidationError(format!("email already registered: {}", email))
		}
		_ => {
			inspect(&err);
			Error::DbError
		}
	})?;

	info!(account = %id, role = %data.role, "account created");
	Ok(id)
}

/// Delete an account together with its tokens
pub(crate) async fn delete(db: &SqlitePool, id: &AccountId) -> FwResult<()> {
	let mut tx = db.begin().await.inspect_err(inspect).or(Err(Error::DbError))?;

	sqlx::query("DELETE FROM access_tokens WHERE account_id = ?1")
		.bind(id.as_str())
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;
	let res = sqlx::query("DELETE FROM accounts WHERE account_id = ?1")
		.bind(id.as_str())
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	tx.commit().await.inspect_err(inspect).or(Err(Error::DbError))?;

	info!(account = %id, "account deleted");
	Ok(())
}

/// List active manager accounts ordered by name
pub(crate) async fn list_active_managers(db: &SqlitePool) -> FwResult<Vec<ManagerInfo>> {
	let rows = sqlx::query(
		"SELECT account_id, name FROM accounts WHERE role = 'M' AND status = 'A'
		ORDER BY name COLLATE NOCASE, account_id",
	)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.or(Err(Error::DbError))?;

	rows.iter()
		.map(|row| {
			let id: String = row.try_get("account_id")?;
			let name: String = row.try_get("name")?;
			Ok(ManagerInfo { id: AccountId::from(id), name: name.into() })
		})
		.collect::<Result<Vec<_>, sqlx::Error>>()
		.inspect_err(inspect)
		.or(Err(Error::DbError))
}

/// Verify login credentials of an active account
pub(crate) async fn check_password(
	db: &SqlitePool,
	email: &str,
	password: &str,
) -> FwResult<AuthCtx> {
	let row = sqlx::query(
		"SELECT account_id, password, role, admin FROM accounts WHERE email = ?1 AND status = 'A'",
	)
	.bind(email.trim().to_lowercase())
	.fetch_optional(db)
	.await
	.inspect_err(inspect)
	.or(Err(Error::DbError))?;

	let Some(row) = row else {
		debug!("login for unknown email");
		return Err(Error::Unauthorized);
	};

	let password_hash: String =
		row.try_get("password").inspect_err(inspect).or(Err(Error::DbError))?;
	let auth_ctx = row_to_auth_ctx(&row).inspect_err(inspect).or(Err(Error::DbError))?;

	crypto::check_password(password.into(), password_hash.into()).await?;
	Ok(auth_ctx)
}

// vim: ts=4
