//! Ownership resolution
//!
//! Every domain record belongs to exactly one standalone account. Domain
//! modules ask [`check_ownership`] before touching a record and
//! [`resolve_acting_owner`] before creating one.
//!
//! - A standalone caller may act on records it owns or created.
//! - A manager must name the client it acts for, must hold an `APPROVED`
//!   entry for that client, and the record must belong to that client.
//! - Records without an owning id fall back to the creator id.

use fleetward_types::relationship_adapter::ClientStatus;

use crate::prelude::*;

/// Ownership fields carried by a domain record
pub trait OwnedRecord {
	/// Owning standalone account, if recorded explicitly
	fn owner_id(&self) -> Option<&AccountId>;
	fn creator_id(&self) -> &AccountId;
}

/// Plain carrier for callers that only have the two ids at hand
#[derive(Clone, Debug)]
pub struct RecordOwnership {
	pub owner_id: Option<AccountId>,
	pub creator_id: AccountId,
}

impl OwnedRecord for RecordOwnership {
	fn owner_id(&self) -> Option<&AccountId> {
		self.owner_id.as_ref()
	}

	fn creator_id(&self) -> &AccountId {
		&self.creator_id
	}
}

/// Who is acting, resolved once per request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestScope {
	Standalone { account_id: AccountId },
	Manager { manager_id: AccountId, client_id: Option<AccountId> },
}

impl RequestScope {
	/// Builds the scope from the caller's role. A target is only meaningful for
	/// managers and is dropped for standalone callers.
	pub fn new(account_id: AccountId, role: AccountRole, target: Option<AccountId>) -> Self {
		match role {
			AccountRole::Standalone => RequestScope::Standalone { account_id },
			AccountRole::Manager => RequestScope::Manager { manager_id: account_id, client_id: target },
		}
	}

	pub fn account_id(&self) -> &AccountId {
		match self {
			RequestScope::Standalone { account_id } => account_id,
			RequestScope::Manager { manager_id, .. } => manager_id,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
	/// The record belongs to someone else
	NotOwner,
	/// A manager did not name the client it acts for
	MissingTarget,
	/// The manager holds no approved entry for the named client
	NotApproved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
	Allow,
	Deny(DenyReason),
}

impl Decision {
	pub fn is_allowed(self) -> bool {
		self == Decision::Allow
	}

	/// Converts a denial into `Forbidden`
	pub fn require(self) -> FwResult<()> {
		match self {
			Decision::Allow => Ok(()),
			Decision::Deny(_) => Err(Error::Forbidden),
		}
	}
}

/// True if `account_id` owns or created the record
pub fn belongs_to(record: &impl OwnedRecord, account_id: &AccountId) -> bool {
	record.owner_id() == Some(account_id) || record.creator_id() == account_id
}

/// Pure decision, given whether the manager's target is an approved client
///
/// `approved` is ignored for standalone scopes.
pub fn resolve(scope: &RequestScope, approved: bool, record: &impl OwnedRecord) -> Decision {
	match scope {
		RequestScope::Standalone { account_id } => {
			if belongs_to(record, account_id) {
				Decision::Allow
			} else {
				Decision::Deny(DenyReason::NotOwner)
			}
		}
		RequestScope::Manager { client_id: None, .. } => Decision::Deny(DenyReason::MissingTarget),
		RequestScope::Manager { client_id: Some(client_id), .. } => {
			if !approved {
				Decision::Deny(DenyReason::NotApproved)
			} else if belongs_to(record, client_id) {
				Decision::Allow
			} else {
				Decision::Deny(DenyReason::NotOwner)
			}
		}
	}
}

/// True if the manager holds an `APPROVED` entry for the client
pub async fn is_approved_client(
	app: &App,
	manager_id: &AccountId,
	client_id: &AccountId,
) -> FwResult<bool> {
	match app.relationship_adapter.read_client(manager_id, client_id).await {
		Ok(entry) => Ok(entry.status == ClientStatus::Approved),
		Err(Error::NotFound) => Ok(false),
		Err(err) => Err(err),
	}
}

/// Decides whether the scope may act on the record
pub async fn check_ownership(
	app: &App,
	scope: &RequestScope,
	record: &impl OwnedRecord,
) -> FwResult<Decision> {
	let approved = match scope {
		RequestScope::Manager { manager_id, client_id: Some(client_id) } => {
			is_approved_client(app, manager_id, client_id).await?
		}
		_ => false,
	};

	let decision = resolve(scope, approved, record);
	if let Decision::Deny(reason) = decision {
		debug!(account = %scope.account_id(), ?reason, "ownership check denied");
	}
	Ok(decision)
}

/// Standalone account a new record must be owned by
pub async fn resolve_acting_owner(app: &App, scope: &RequestScope) -> FwResult<AccountId> {
	match scope {
		RequestScope::Standalone { account_id } => Ok(account_id.clone()),
		RequestScope::Manager { client_id: None, .. } => Err(Error::Forbidden),
		RequestScope::Manager { manager_id, client_id: Some(client_id) } => {
			if is_approved_client(app, manager_id, client_id).await? {
				Ok(client_id.clone())
			} else {
				Err(Error::Forbidden)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(owner: Option<&str>, creator: &str) -> RecordOwnership {
		RecordOwnership { owner_id: owner.map(AccountId::new), creator_id: AccountId::new(creator) }
	}

	fn standalone(id: &str) -> RequestScope {
		RequestScope::new(AccountId::new(id), AccountRole::Standalone, None)
	}

	fn manager(target: Option<&str>) -> RequestScope {
		RequestScope::new(AccountId::new("m"), AccountRole::Manager, target.map(AccountId::new))
	}

	#[test]
	fn test_standalone_owner_or_creator() {
		assert!(resolve(&standalone("s"), false, &record(Some("s"), "m")).is_allowed());
		assert!(resolve(&standalone("s"), false, &record(Some("x"), "s")).is_allowed());
		assert_eq!(
			resolve(&standalone("s"), false, &record(Some("x"), "y")),
			Decision::Deny(DenyReason::NotOwner)
		);
	}

	#[test]
	fn test_creator_only_record() {
		assert!(resolve(&standalone("s"), false, &record(None, "s")).is_allowed());
		assert!(!resolve(&standalone("s"), false, &record(None, "x")).is_allowed());
		assert!(resolve(&manager(Some("c")), true, &record(None, "c")).is_allowed());
	}

	#[test]
	fn test_manager_without_target_always_denied() {
		for rec in [record(Some("m"), "m"), record(None, "m"), record(Some("c"), "c")] {
			assert_eq!(resolve(&manager(None), true, &rec), Decision::Deny(DenyReason::MissingTarget));
		}
	}

	#[test]
	fn test_manager_needs_approval_and_matching_record() {
		let rec = record(Some("c"), "m");
		assert!(resolve(&manager(Some("c")), true, &rec).is_allowed());
		assert_eq!(resolve(&manager(Some("c")), false, &rec), Decision::Deny(DenyReason::NotApproved));
		assert_eq!(
			resolve(&manager(Some("other")), true, &rec),
			Decision::Deny(DenyReason::NotOwner)
		);
	}

	#[test]
	fn test_standalone_scope_drops_target() {
		let scope = RequestScope::new(AccountId::new("s"), AccountRole::Standalone, Some("c".into()));
		assert_eq!(scope, standalone("s"));
		assert!(Decision::Deny(DenyReason::NotOwner).require().is_err());
	}
}

// vim: ts=4
