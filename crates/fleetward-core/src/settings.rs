//! Core settings

use fleetward_types::relationship_adapter::DEFAULT_CLIENT_LIMIT;

use crate::prelude::*;

/// Tunables shared by the relationship service and the auth boundary
#[derive(Clone, Debug)]
pub struct CoreSettings {
	/// Limit given to a relationship created lazily
	pub default_client_limit: u32,
	/// Upper bound for limits set by administrators
	pub max_client_limit: u32,
	/// Length of generated client credentials
	pub credential_length: usize,
	/// Lifetime of issued access tokens in seconds
	pub token_ttl_secs: i64,
}

impl Default for CoreSettings {
	fn default() -> Self {
		Self {
			default_client_limit: DEFAULT_CLIENT_LIMIT,
			max_client_limit: 1000,
			credential_length: 16,
			token_ttl_secs: 8 * 3600,
		}
	}
}

impl CoreSettings {
	pub fn validate(&self) -> FwResult<()> {
		if self.default_client_limit == 0 {
			return Err(Error::ValidationError("default client limit must be positive".into()));
		}
		if self.default_client_limit > self.max_client_limit {
			return Err(Error::ValidationError(format!(
				"default client limit {} exceeds maximum {}",
				self.default_client_limit, self.max_client_limit
			)));
		}
		if self.credential_length < 8 {
			return Err(Error::ValidationError("credential length must be at least 8".into()));
		}
		if self.token_ttl_secs <= 0 {
			return Err(Error::ValidationError("token ttl must be positive".into()));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_are_valid() {
		let settings = CoreSettings::default();
		assert_eq!(settings.default_client_limit, 4);
		assert!(settings.validate().is_ok());
	}

	#[test]
	fn test_rejects_bad_limits() {
		let zero = CoreSettings { default_client_limit: 0, ..CoreSettings::default() };
		assert!(zero.validate().is_err());

		let above = CoreSettings {
			default_client_limit: 10,
			max_client_limit: 5,
			..CoreSettings::default()
		};
		assert!(above.validate().is_err());
	}
}

// vim: ts=4
