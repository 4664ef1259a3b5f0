//! Server configuration from environment variables

use std::path::PathBuf;
use std::str::FromStr;

use crate::prelude::*;
use fleetward_core::settings::CoreSettings;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
pub const DEFAULT_DB_DIR: &str = "./data";
pub const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Site administrator created at startup
#[derive(Clone, Debug)]
pub struct AdminBootstrap {
	pub name: Box<str>,
	pub email: Box<str>,
	pub password: Box<str>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
	pub listen: Box<str>,
	pub db_dir: PathBuf,
	pub settings: CoreSettings,
	pub admin: Option<AdminBootstrap>,
}

impl ServerConfig {
	pub fn from_env() -> FwResult<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds the config from any key lookup, so tests need not touch the process env
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> FwResult<Self> {
		let defaults = CoreSettings::default();
		let settings = CoreSettings {
			default_client_limit: parse_or(
				&lookup,
				"FW_DEFAULT_CLIENT_LIMIT",
				defaults.default_client_limit,
			)?,
			max_client_limit: parse_or(&lookup, "FW_MAX_CLIENT_LIMIT", defaults.max_client_limit)?,
			credential_length: parse_or(
				&lookup,
				"FW_CREDENTIAL_LENGTH",
				defaults.credential_length,
			)?,
			token_ttl_secs: parse_or(&lookup, "FW_TOKEN_TTL", defaults.token_ttl_secs)?,
		};
		settings.validate()?;

		let admin = match (lookup("FW_ADMIN_EMAIL"), lookup("FW_ADMIN_PASSWORD")) {
			(Some(email), Some(password)) => Some(AdminBootstrap {
				name: lookup("FW_ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.into()).into(),
				email: email.into(),
				password: password.into(),
			}),
			(Some(_), None) | (None, Some(_)) => {
				return Err(Error::ValidationError(
					"FW_ADMIN_EMAIL and FW_ADMIN_PASSWORD must be set together".into(),
				));
			}
			(None, None) => None,
		};

		Ok(ServerConfig {
			listen: lookup("FW_LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.into()).into(),
			db_dir: PathBuf::from(lookup("FW_DB_DIR").unwrap_or_else(|| DEFAULT_DB_DIR.into())),
			settings,
			admin,
		})
	}
}

fn parse_or<T: FromStr>(
	lookup: &impl Fn(&str) -> Option<String>,
	key: &str,
	default: T,
) -> FwResult<T> {
	match lookup(key) {
		Some(value) => value
			.trim()
			.parse()
			.map_err(|_| Error::ValidationError(format!("invalid value for {}: {}", key, value))),
		None => Ok(default),
	}
}


// vim: ts=4
