//! Relationship state machine
//!
//! Pure transition rules for client entries. Nothing here touches storage:
//! the resulting [`Step`] is handed to the store, which applies it as one
//! conditional write.

use fleetward_types::relationship_adapter::{ApprovedAt, ClientStatus, RelationshipAction};

use crate::prelude::*;

/// Party allowed to initiate an action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Actor {
	Manager,
	Client,
	/// Either party or a site administrator
	Any,
}

/// Outcome of a legal action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
	/// Status the entry must still have when the write lands (`None`: no live entry)
	pub from: Option<ClientStatus>,
	pub to: ClientStatus,
	pub approved_at: ApprovedAt,
}

pub fn actor(action: RelationshipAction) -> Actor {
	use RelationshipAction as A;
	match action {
		A::DirectCreate
		| A::ApproveJoin
		| A::RejectJoin
		| A::AcceptLeave
		| A::RejectLeave
		| A::RequestRemoval => Actor::Manager,
		A::RequestJoin | A::RequestLeave | A::AcceptRemoval | A::RejectRemoval => Actor::Client,
		A::Revoke => Actor::Any,
	}
}

/// Actions that create or reactivate an entry and therefore consume a slot
pub fn is_admission(action: RelationshipAction) -> bool {
	matches!(action, RelationshipAction::DirectCreate | RelationshipAction::RequestJoin)
}

/// Computes the next status of an entry, or `InvalidTransition`
///
/// `current` is the entry's status, `None` if the client has no entry with this
/// manager. A revoked entry behaves like a missing one for admissions.
pub fn next(
	current: Option<ClientStatus>,
	action: RelationshipAction,
	now: Timestamp,
) -> FwResult<Step> {
	use ClientStatus as S;
	use RelationshipAction as A;

	let invalid = || Error::InvalidTransition { status: current, action };

	let step = match (action, current) {
		(A::DirectCreate, None | Some(S::Revoked)) => {
			Step { from: current, to: S::Approved, approved_at: ApprovedAt::Set(now) }
		}
		(A::RequestJoin, None | Some(S::Revoked)) => {
			Step { from: current, to: S::Pending, approved_at: ApprovedAt::Clear }
		}
		(A::ApproveJoin, Some(S::Pending)) => {
			Step { from: current, to: S::Approved, approved_at: ApprovedAt::Set(now) }
		}
		(A::RejectJoin, Some(S::Pending))
		| (A::AcceptLeave, Some(S::LeaveRequested))
		| (A::AcceptRemoval, Some(S::RemoveRequested)) => {
			Step { from: current, to: S::Revoked, approved_at: ApprovedAt::Keep }
		}
		(A::RequestLeave, Some(S::Approved)) => {
			Step { from: current, to: S::LeaveRequested, approved_at: ApprovedAt::Keep }
		}
		(A::RequestRemoval, Some(S::Approved)) => {
			Step { from: current, to: S::RemoveRequested, approved_at: ApprovedAt::Keep }
		}
		// Retained clients keep their original approval time
		(A::RejectLeave, Some(S::LeaveRequested)) | (A::RejectRemoval, Some(S::RemoveRequested)) => {
			Step { from: current, to: S::Approved, approved_at: ApprovedAt::Keep }
		}
		(A::Revoke, Some(status)) if status.is_active() => {
			Step { from: current, to: S::Revoked, approved_at: ApprovedAt::Keep }
		}
		_ => return Err(invalid()),
	};

	Ok(step)
}


// vim: ts=4
