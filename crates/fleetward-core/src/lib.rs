//! Core infrastructure for the Fleetward backend.
//!
//! Holds the shared application state together with the pure relationship
//! rules (state machine, capacity, ownership) and the axum glue that applies
//! them to requests.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod capacity;
pub mod extract;
pub mod middleware;
pub mod ownership;
pub mod prelude;
pub mod settings;
pub mod state_machine;

pub use app::{Adapters, App, AppState};
pub use extract::Auth;
pub use middleware::{PermissionCheckOutput, require_admin, require_auth, require_role};
pub use ownership::{Decision, DenyReason, OwnedRecord, RecordOwnership, RequestScope};

// vim: ts=4
