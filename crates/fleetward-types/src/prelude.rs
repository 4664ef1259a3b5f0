pub use crate::error::{Error, FwResult};
pub use crate::types::{AccountId, AccountRole, Timestamp};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
