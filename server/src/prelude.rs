pub use fleetward_core::prelude::*;

// vim: ts=4
