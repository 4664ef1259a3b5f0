pub use crate::app::App;
pub use fleetward_types::prelude::*;

// vim: ts=4
