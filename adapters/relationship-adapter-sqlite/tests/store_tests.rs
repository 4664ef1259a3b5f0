//! Relationship store tests
//!
//! Admission, reactivation and conditional transitions against a real
//! SQLite database.

use fleetward_relationship_adapter_sqlite::RelationshipAdapterSqlite;
use fleetward_types::error::Error;
use fleetward_types::relationship_adapter::{
	ApprovedAt, ClientStatus, ListClientOptions, RelationshipAdapter, Transition,
};
use fleetward_types::types::{AccountId, Timestamp};
use tempfile::TempDir;

async fn create_test_adapter() -> (RelationshipAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter =
		RelationshipAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");
	(adapter, temp_dir)
}

fn id(s: &str) -> AccountId {
	AccountId::new(s)
}

#[tokio::test]
async fn test_read_missing_relationship() {
	let (adapter, _temp) = create_test_adapter().await;

	let res = adapter.read_relationship(&id("nobody")).await;
	assert!(matches!(res, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_ensure_relationship_is_idempotent() {
	let (adapter, _temp) = create_test_adapter().await;

	let rel = adapter.ensure_relationship(&id("m1"), 4).await.expect("ensure");
	assert_eq!(rel.client_limit, 4);
	assert!(rel.clients.is_empty());

	// A second call must not reset the limit
	adapter.update_client_limit(&id("m1"), 7).await.expect("update limit");
	let rel = adapter.ensure_relationship(&id("m1"), 4).await.expect("ensure");
	assert_eq!(rel.client_limit, 7);
}

#[tokio::test]
async fn test_admit_pending_and_approved() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.ensure_relationship(&id("m1"), 4).await.expect("ensure");

	let pending = adapter
		.admit_client(&id("m1"), &id("c1"), ClientStatus::Pending, Timestamp(100))
		.await
		.expect("admit pending");
	assert_eq!(pending.status, ClientStatus::Pending);
	assert_eq!(pending.requested_at, Timestamp(100));
	assert_eq!(pending.approved_at, None);

	let approved = adapter
		.admit_client(&id("m1"), &id("c2"), ClientStatus::Approved, Timestamp(200))
		.await
		.expect("admit approved");
	assert_eq!(approved.status, ClientStatus::Approved);
	assert_eq!(approved.approved_at, Some(Timestamp(200)));

	let rel = adapter.read_relationship(&id("m1")).await.expect("read");
	assert_eq!(rel.active_count(), 2);
	assert_eq!(rel.clients[0].client_id, id("c1"));
	assert_eq!(rel.clients[1].client_id, id("c2"));
}

#[tokio::test]
async fn test_admit_respects_limit() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.ensure_relationship(&id("m1"), 1).await.expect("ensure");

	adapter
		.admit_client(&id("m1"), &id("a"), ClientStatus::Approved, Timestamp(1))
		.await
		.expect("first admission");

	let res = adapter.admit_client(&id("m1"), &id("b"), ClientStatus::Pending, Timestamp(2)).await;
	assert!(matches!(res, Err(Error::CapacityExceeded { limit: 1, current: 1 })), "{:?}", res);
}

#[tokio::test]
async fn test_client_cannot_be_live_with_two_managers() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.ensure_relationship(&id("m1"), 4).await.expect("ensure");
	adapter.ensure_relationship(&id("m2"), 4).await.expect("ensure");

	adapter
		.admit_client(&id("m1"), &id("c1"), ClientStatus::Pending, Timestamp(1))
		.await
		.expect("admit");

	let res = adapter.admit_client(&id("m2"), &id("c1"), ClientStatus::Pending, Timestamp(2)).await;
	assert!(matches!(res, Err(Error::AlreadyAssigned)), "{:?}", res);

	// Same manager twice is refused as well
	let res = adapter.admit_client(&id("m1"), &id("c1"), ClientStatus::Pending, Timestamp(3)).await;
	assert!(matches!(res, Err(Error::AlreadyAssigned)), "{:?}", res);

	let found = adapter.find_assignment(&id("c1")).await.expect("find").expect("assignment");
	assert_eq!(found.manager_id, id("m1"));
}

#[tokio::test]
async fn test_revoked_entry_is_reused() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.ensure_relationship(&id("m1"), 4).await.expect("ensure");

	let first = adapter
		.admit_client(&id("m1"), &id("c1"), ClientStatus::Approved, Timestamp(10))
		.await
		.expect("admit");
	adapter
		.transition_client(Transition {
			manager_id: &id("m1"),
			client_id: &id("c1"),
			from: ClientStatus::Approved,
			to: ClientStatus::Revoked,
			approved_at: ApprovedAt::Keep,
		})
		.await
		.expect("revoke");

	let again = adapter
		.admit_client(&id("m1"), &id("c1"), ClientStatus::Pending, Timestamp(20))
		.await
		.expect("rejoin");
	assert_eq!(again.entry_id, first.entry_id);
	assert_eq!(again.status, ClientStatus::Pending);
	assert_eq!(again.requested_at, Timestamp(20));
	assert_eq!(again.approved_at, None);

	let rel = adapter.read_relationship(&id("m1")).await.expect("read");
	assert_eq!(rel.clients.len(), 1);
}

#[tokio::test]
async fn test_revoked_client_can_join_another_manager() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.ensure_relationship(&id("m1"), 4).await.expect("ensure");
	adapter.ensure_relationship(&id("m2"), 4).await.expect("ensure");

	adapter
		.admit_client(&id("m1"), &id("c1"), ClientStatus::Pending, Timestamp(1))
		.await
		.expect("admit");
	adapter
		.transition_client(Transition {
			manager_id: &id("m1"),
			client_id: &id("c1"),
			from: ClientStatus::Pending,
			to: ClientStatus::Revoked,
			approved_at: ApprovedAt::Keep,
		})
		.await
		.expect("reject");

	let entry = adapter
		.admit_client(&id("m2"), &id("c1"), ClientStatus::Pending, Timestamp(2))
		.await
		.expect("join m2");
	assert_eq!(entry.status, ClientStatus::Pending);
	assert!(adapter.find_assignment(&id("c1")).await.expect("find").is_some());
}

#[tokio::test]
async fn test_transition_requires_expected_status() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.ensure_relationship(&id("m1"), 4).await.expect("ensure");
	adapter
		.admit_client(&id("m1"), &id("c1"), ClientStatus::Pending, Timestamp(1))
		.await
		.expect("admit");

	let approve = Transition {
		manager_id: &id("m1"),
		client_id: &id("c1"),
		from: ClientStatus::Pending,
		to: ClientStatus::Approved,
		approved_at: ApprovedAt::Set(Timestamp(5)),
	};
	let entry = adapter.transition_client(approve).await.expect("approve");
	assert_eq!(entry.status, ClientStatus::Approved);
	assert_eq!(entry.approved_at, Some(Timestamp(5)));

	// Second approval finds the entry no longer pending
	let res = adapter.transition_client(approve).await;
	assert!(matches!(res, Err(Error::ConflictingWrite)), "{:?}", res);

	let missing = Transition { client_id: &id("ghost"), ..approve };
	assert!(matches!(adapter.transition_client(missing).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_lowering_limit_keeps_existing_clients() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.ensure_relationship(&id("m1"), 3).await.expect("ensure");
	for c in ["a", "b", "c"] {
		adapter
			.admit_client(&id("m1"), &id(c), ClientStatus::Approved, Timestamp(1))
			.await
			.expect("admit");
	}

	adapter.update_client_limit(&id("m1"), 1).await.expect("lower limit");

	let rel = adapter.read_relationship(&id("m1")).await.expect("read");
	assert_eq!(rel.client_limit, 1);
	assert_eq!(rel.active_count(), 3);

	let res = adapter.admit_client(&id("m1"), &id("d"), ClientStatus::Pending, Timestamp(2)).await;
	assert!(matches!(res, Err(Error::CapacityExceeded { limit: 1, current: 3 })), "{:?}", res);
}

#[tokio::test]
async fn test_list_clients_by_status() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.ensure_relationship(&id("m1"), 4).await.expect("ensure");
	adapter
		.admit_client(&id("m1"), &id("a"), ClientStatus::Pending, Timestamp(1))
		.await
		.expect("admit");
	adapter
		.admit_client(&id("m1"), &id("b"), ClientStatus::Approved, Timestamp(2))
		.await
		.expect("admit");

	let pending = adapter
		.list_clients(&id("m1"), &ListClientOptions { status: Some(&[ClientStatus::Pending]) })
		.await
		.expect("list");
	assert_eq!(pending.len(), 1);
	assert_eq!(pending[0].client_id, id("a"));

	let all = adapter.list_clients(&id("m1"), &ListClientOptions::default()).await.expect("list");
	assert_eq!(all.len(), 2);
}

// vim: ts=4
