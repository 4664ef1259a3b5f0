//! Manager ↔ client relationship service.
//!
//! `service` holds the operations, `handler` exposes them over HTTP and
//! dispatches on the caller's role.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod handler;
mod prelude;
pub mod service;

// vim: ts=4
