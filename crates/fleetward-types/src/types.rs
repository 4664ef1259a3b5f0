//! Common types used throughout the Fleetward backend.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::time::SystemTime;

// AccountId //
//***********//
/// Opaque identifier of an account (manager or standalone)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub Box<str>);

impl AccountId {
	pub fn new(id: &str) -> AccountId {
		AccountId(Box::from(id))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for AccountId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for AccountId {
	fn from(id: &str) -> Self {
		AccountId::new(id)
	}
}

impl From<String> for AccountId {
	fn from(id: String) -> Self {
		AccountId(id.into_boxed_str())
	}
}

impl AsRef<str> for AccountId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

// AccountRole //
//*************//
/// The two account kinds relevant to ownership
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
	/// Acts on behalf of approved client accounts
	Manager,
	/// Owns its own operational records, optionally managed
	Standalone,
}

impl AccountRole {
	/// Single character storage code
	pub fn code(self) -> &'static str {
		match self {
			AccountRole::Manager => "M",
			AccountRole::Standalone => "S",
		}
	}

	pub fn from_code(code: &str) -> Option<Self> {
		match code {
			"M" => Some(AccountRole::Manager),
			"S" => Some(AccountRole::Standalone),
			_ => None,
		}
	}
}

impl std::fmt::Display for AccountRole {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			AccountRole::Manager => f.write_str("manager"),
			AccountRole::Standalone => f.write_str("standalone"),
		}
	}
}

// Timestamp //
//***********//
/// Unix timestamp in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		#[allow(clippy::cast_possible_wrap)]
		Timestamp(res.as_secs() as i64)
	}

	pub fn add_seconds(&self, seconds: i64) -> Timestamp {
		Timestamp(self.0.saturating_add(seconds))
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

// ApiResponse //
//*************//
/// Offset based pagination info attached to list responses
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
	pub offset: usize,
	pub limit: usize,
	pub total: usize,
}

/// Standard response envelope
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
	pub pagination: Option<Pagination>,
	pub time: Timestamp,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, pagination: None, time: Timestamp::now() }
	}

	pub fn with_pagination(data: T, offset: usize, limit: usize, total: usize) -> Self {
		Self { data, pagination: Some(Pagination { offset, limit, total }), time: Timestamp::now() }
	}
}


// vim: ts=4
