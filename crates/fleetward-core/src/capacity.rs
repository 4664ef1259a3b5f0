//! Capacity enforcement
//!
//! The authoritative check runs inside the store's admission statement. The
//! helpers here give early, readable failures and report the current usage.

use serde::Serialize;

use fleetward_types::relationship_adapter::Relationship;

use crate::prelude::*;
use crate::settings::CoreSettings;

/// Usage of a manager's client slots
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitStatus {
	pub limit: u32,
	pub active: u32,
	pub remaining: u32,
	pub at_capacity: bool,
}

impl LimitStatus {
	pub fn of(relationship: &Relationship) -> Self {
		Self::new(relationship.client_limit, relationship.active_count())
	}

	pub fn new(limit: u32, active: u32) -> Self {
		Self { limit, active, remaining: limit.saturating_sub(active), at_capacity: active >= limit }
	}
}

/// Fails with `CapacityExceeded` unless one more client fits
pub fn check_capacity(relationship: &Relationship) -> FwResult<()> {
	let active = relationship.active_count();
	if active >= relationship.client_limit {
		debug!(
			manager = %relationship.manager_id,
			limit = relationship.client_limit,
			active,
			"client limit reached"
		);
		return Err(Error::CapacityExceeded { limit: relationship.client_limit, current: active });
	}
	Ok(())
}

/// Validates a limit requested by an administrator
pub fn validate_limit(limit: u32, settings: &CoreSettings) -> FwResult<()> {
	if limit == 0 || limit > settings.max_client_limit {
		return Err(Error::ValidationError(format!(
			"client limit must be between 1 and {}",
			settings.max_client_limit
		)));
	}
	Ok(())
}


// vim: ts=4
