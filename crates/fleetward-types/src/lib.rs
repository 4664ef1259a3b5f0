//! Shared types, adapter traits, and core utilities for the Fleetward backend.
//!
//! This crate contains the foundational types that are shared between the
//! server, the feature crates and all adapter implementations. Keeping them in
//! a separate crate lets adapter crates compile without pulling in the HTTP
//! layer.

pub mod account_directory;
pub mod error;
pub mod notify_adapter;
pub mod prelude;
pub mod relationship_adapter;
pub mod types;
pub mod utils;

// vim: ts=4
