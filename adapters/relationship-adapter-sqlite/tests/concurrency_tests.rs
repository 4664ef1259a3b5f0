//! Concurrent admission tests
//!
//! Many simultaneous admissions against one manager must never push the
//! active count over the limit.

use std::sync::Arc;

use fleetward_relationship_adapter_sqlite::RelationshipAdapterSqlite;
use fleetward_types::error::Error;
use fleetward_types::relationship_adapter::{ClientStatus, RelationshipAdapter};
use fleetward_types::types::{AccountId, Timestamp};
use tempfile::TempDir;

async fn create_test_adapter() -> (Arc<RelationshipAdapterSqlite>, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter =
		RelationshipAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");
	(Arc::new(adapter), temp_dir)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_admissions_never_exceed_limit() {
	let (adapter, _temp) = create_test_adapter().await;
	let manager = AccountId::new("m1");
	let limit = 3;
	adapter.ensure_relationship(&manager, limit).await.expect("ensure");

	let mut handles = vec![];
	for i in 0..10 {
		let adapter = Arc::clone(&adapter);
		let manager = manager.clone();
		handles.push(tokio::spawn(async move {
			let status = if i % 2 == 0 { ClientStatus::Pending } else { ClientStatus::Approved };
			adapter
				.admit_client(&manager, &AccountId::new(&format!("c{}", i)), status, Timestamp(i))
				.await
		}));
	}

	let mut admitted = 0;
	for handle in handles {
		match handle.await.expect("Task panicked") {
			Ok(_) => admitted += 1,
			Err(Error::CapacityExceeded { limit: l, .. }) => assert_eq!(l, limit),
			Err(err) => panic!("unexpected error: {:?}", err),
		}
	}

	assert_eq!(admitted, limit);
	let rel = adapter.read_relationship(&manager).await.expect("read");
	assert_eq!(rel.active_count(), limit);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_of_one_client() {
	let (adapter, _temp) = create_test_adapter().await;
	let client = AccountId::new("c1");
	for m in 0..5 {
		adapter.ensure_relationship(&AccountId::new(&format!("m{}", m)), 4).await.expect("ensure");
	}

	let mut handles = vec![];
	for m in 0..5 {
		let adapter = Arc::clone(&adapter);
		let client = client.clone();
		handles.push(tokio::spawn(async move {
			adapter
				.admit_client(
					&AccountId::new(&format!("m{}", m)),
					&client,
					ClientStatus::Pending,
					Timestamp(1),
				)
				.await
		}));
	}

	let mut admitted = 0;
	for handle in handles {
		match handle.await.expect("Task panicked") {
			Ok(_) => admitted += 1,
			Err(Error::AlreadyAssigned) => {}
			Err(err) => panic!("unexpected error: {:?}", err),
		}
	}

	assert_eq!(admitted, 1);
}

// vim: ts=4
