//! Adapter that persists manager ↔ client relationships.
//!
//! One relationship record exists per manager. It carries the manager's client
//! limit and the ordered list of every client entry the manager ever had.
//! Entries are never removed: a revoked entry stays in place and is reset when
//! the same client asks to join again.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

/// Default number of live clients a manager may hold
pub const DEFAULT_CLIENT_LIMIT: u32 = 4;

// ClientStatus //
//**************//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientStatus {
	Pending,
	Approved,
	LeaveRequested,
	RemoveRequested,
	Revoked,
}

impl ClientStatus {
	/// All statuses that hold a slot and block the client from other managers
	pub const LIVE: [ClientStatus; 4] = [
		ClientStatus::Pending,
		ClientStatus::Approved,
		ClientStatus::LeaveRequested,
		ClientStatus::RemoveRequested,
	];

	/// Single character storage code
	pub fn code(self) -> &'static str {
		match self {
			ClientStatus::Pending => "P",
			ClientStatus::Approved => "A",
			ClientStatus::LeaveRequested => "L",
			ClientStatus::RemoveRequested => "M",
			ClientStatus::Revoked => "R",
		}
	}

	pub fn from_code(code: &str) -> Option<Self> {
		match code {
			"P" => Some(ClientStatus::Pending),
			"A" => Some(ClientStatus::Approved),
			"L" => Some(ClientStatus::LeaveRequested),
			"M" => Some(ClientStatus::RemoveRequested),
			"R" => Some(ClientStatus::Revoked),
			_ => None,
		}
	}

	/// Anything but `Revoked` counts as active
	pub fn is_active(self) -> bool {
		self != ClientStatus::Revoked
	}
}

impl std::fmt::Display for ClientStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			ClientStatus::Pending => "PENDING",
			ClientStatus::Approved => "APPROVED",
			ClientStatus::LeaveRequested => "LEAVE_REQUESTED",
			ClientStatus::RemoveRequested => "REMOVE_REQUESTED",
			ClientStatus::Revoked => "REVOKED",
		};
		f.write_str(s)
	}
}

impl std::str::FromStr for ClientStatus {
	type Err = Error;

	/// Parses the wire name (`PENDING`, `LEAVE_REQUESTED`, ...), case-insensitively
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"PENDING" => Ok(ClientStatus::Pending),
			"APPROVED" => Ok(ClientStatus::Approved),
			"LEAVE_REQUESTED" => Ok(ClientStatus::LeaveRequested),
			"REMOVE_REQUESTED" => Ok(ClientStatus::RemoveRequested),
			"REVOKED" => Ok(ClientStatus::Revoked),
			_ => Err(Error::ValidationError(format!("unknown client status: {}", s))),
		}
	}
}

// RelationshipAction //
//********************//
/// Every action that can be applied to a client entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipAction {
	DirectCreate,
	RequestJoin,
	ApproveJoin,
	RejectJoin,
	RequestLeave,
	AcceptLeave,
	RejectLeave,
	RequestRemoval,
	AcceptRemoval,
	RejectRemoval,
	Revoke,
}

impl std::fmt::Display for RelationshipAction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			RelationshipAction::DirectCreate => "direct create",
			RelationshipAction::RequestJoin => "request join",
			RelationshipAction::ApproveJoin => "approve join",
			RelationshipAction::RejectJoin => "reject join",
			RelationshipAction::RequestLeave => "request leave",
			RelationshipAction::AcceptLeave => "accept leave",
			RelationshipAction::RejectLeave => "reject leave",
			RelationshipAction::RequestRemoval => "request removal",
			RelationshipAction::AcceptRemoval => "accept removal",
			RelationshipAction::RejectRemoval => "reject removal",
			RelationshipAction::Revoke => "revoke",
		};
		f.write_str(s)
	}
}

/// How a transition treats the `approved_at` timestamp
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovedAt {
	Keep,
	Set(Timestamp),
	Clear,
}

// Records //
//*********//
/// A client entry embedded in a manager's relationship record
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEntry {
	/// Store assigned creation identity, stable across re-joins
	pub entry_id: i64,
	pub client_id: AccountId,
	pub status: ClientStatus,
	pub requested_at: Timestamp,
	pub approved_at: Option<Timestamp>,
}

/// The per-manager relationship record
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
	pub manager_id: AccountId,
	pub client_limit: u32,
	pub clients: Vec<ClientEntry>,
	pub created_at: Timestamp,
}

impl Relationship {
	/// Number of entries not in `Revoked` status
	pub fn active_count(&self) -> u32 {
		let count = self.clients.iter().filter(|c| c.status.is_active()).count();
		u32::try_from(count).unwrap_or(u32::MAX)
	}

	pub fn client(&self, client_id: &AccountId) -> Option<&ClientEntry> {
		self.clients.iter().find(|c| &c.client_id == client_id)
	}
}

/// A live entry found by client id, with the manager that holds it
#[derive(Clone, Debug)]
pub struct Assignment {
	pub manager_id: AccountId,
	pub entry: ClientEntry,
}

/// Options for listing client entries of a manager
#[derive(Debug, Default)]
pub struct ListClientOptions<'a> {
	pub status: Option<&'a [ClientStatus]>,
}

/// A conditional status change: applied only if the entry still has `from`
#[derive(Clone, Copy, Debug)]
pub struct Transition<'a> {
	pub manager_id: &'a AccountId,
	pub client_id: &'a AccountId,
	pub from: ClientStatus,
	pub to: ClientStatus,
	pub approved_at: ApprovedAt,
}

/// Relationship store interface
///
/// Every write is a single conditional operation evaluated by the store, so
/// concurrent requests against the same manager can never both pass a check
/// that only one of them should pass.
#[async_trait]
pub trait RelationshipAdapter: Debug + Send + Sync {
	/// Reads the full relationship record of a manager, `NotFound` if none exists
	async fn read_relationship(&self, manager_id: &AccountId) -> FwResult<Relationship>;

	/// Creates the relationship record with the given limit if it does not exist yet,
	/// then returns it
	async fn ensure_relationship(
		&self,
		manager_id: &AccountId,
		default_limit: u32,
	) -> FwResult<Relationship>;

	/// Reads a single entry of a manager
	async fn read_client(
		&self,
		manager_id: &AccountId,
		client_id: &AccountId,
	) -> FwResult<ClientEntry>;

	/// Finds the live (non revoked) entry of a client across all managers
	async fn find_assignment(&self, client_id: &AccountId) -> FwResult<Option<Assignment>>;

	/// Lists entries of a manager in creation order
	async fn list_clients(
		&self,
		manager_id: &AccountId,
		opts: &ListClientOptions<'_>,
	) -> FwResult<Vec<ClientEntry>>;

	/// Admits a client as `Pending` or `Approved`.
	///
	/// Inserts a new entry or resets a revoked one, only if the manager's active
	/// count is below its limit and the client has no live entry anywhere.
	/// Fails with `CapacityExceeded` or `AlreadyAssigned` otherwise.
	async fn admit_client(
		&self,
		manager_id: &AccountId,
		client_id: &AccountId,
		status: ClientStatus,
		now: Timestamp,
	) -> FwResult<ClientEntry>;

	/// Applies a conditional status change, `ConflictingWrite` if the entry no
	/// longer has the expected status
	async fn transition_client(&self, transition: Transition<'_>) -> FwResult<ClientEntry>;

	/// Sets the client limit, creating the relationship record if needed.
	/// Existing entries are left untouched.
	async fn update_client_limit(&self, manager_id: &AccountId, limit: u32) -> FwResult<()>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(client: &str, status: ClientStatus) -> ClientEntry {
		ClientEntry {
			entry_id: 1,
			client_id: AccountId::new(client),
			status,
			requested_at: Timestamp(0),
			approved_at: None,
		}
	}

	#[test]
	fn test_status_codes_round_trip() {
		for status in ClientStatus::LIVE.iter().chain([ClientStatus::Revoked].iter()) {
			assert_eq!(ClientStatus::from_code(status.code()), Some(*status));
		}
		assert_eq!(ClientStatus::from_code("?"), None);
	}

	#[test]
	fn test_active_count_ignores_revoked() {
		let rel = Relationship {
			manager_id: AccountId::new("m"),
			client_limit: DEFAULT_CLIENT_LIMIT,
			clients: vec![
				entry("a", ClientStatus::Approved),
				entry("b", ClientStatus::Revoked),
				entry("c", ClientStatus::Pending),
				entry("d", ClientStatus::LeaveRequested),
			],
			created_at: Timestamp(0),
		};
		assert_eq!(rel.active_count(), 3);
		assert!(rel.client(&AccountId::new("b")).is_some());
		assert!(rel.client(&AccountId::new("x")).is_none());
	}

	#[test]
	fn test_status_parses_wire_names() {
		assert_eq!("leave_requested".parse::<ClientStatus>().ok(), Some(ClientStatus::LeaveRequested));
		assert_eq!(" REVOKED ".parse::<ClientStatus>().ok(), Some(ClientStatus::Revoked));
		assert!("gone".parse::<ClientStatus>().is_err());
	}

	#[test]
	fn test_status_serializes_screaming() {
		let json = serde_json::to_string(&ClientStatus::LeaveRequested).unwrap();
		assert_eq!(json, "\"LEAVE_REQUESTED\"");
	}
}

// vim: ts=4
