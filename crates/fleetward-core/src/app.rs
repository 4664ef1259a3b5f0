//! App state type

use std::sync::Arc;

use crate::settings::CoreSettings;
use fleetward_types::account_directory::AccountDirectory;
use fleetward_types::error::FwResult;
use fleetward_types::notify_adapter::Notifier;
use fleetward_types::relationship_adapter::RelationshipAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
pub struct AppState {
	pub settings: CoreSettings,

	pub relationship_adapter: Arc<dyn RelationshipAdapter>,
	pub account_directory: Arc<dyn AccountDirectory>,
	pub notifier: Arc<dyn Notifier>,
}

pub type App = Arc<AppState>;

pub struct Adapters {
	pub relationship_adapter: Arc<dyn RelationshipAdapter>,
	pub account_directory: Arc<dyn AccountDirectory>,
	pub notifier: Arc<dyn Notifier>,
}

impl AppState {
	/// Validates the settings and assembles the shared state
	pub fn build(adapters: Adapters, settings: CoreSettings) -> FwResult<App> {
		settings.validate()?;
		Ok(Arc::new(AppState {
			settings,
			relationship_adapter: adapters.relationship_adapter,
			account_directory: adapters.account_directory,
			notifier: adapters.notifier,
		}))
	}
}

// vim: ts=4
