//! Custom extractors for Fleetward-specific data

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::ownership::RequestScope;
use crate::prelude::*;
use fleetward_types::account_directory::AuthCtx;

/// Header a manager uses to name the client it acts for
pub const CLIENT_ID_HEADER: &str = "x-client-id";

// Auth //
//******//
#[derive(Debug, Clone)]
pub struct Auth(pub AuthCtx);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth) = parts.extensions.get::<Auth>().cloned() {
			Ok(auth)
		} else {
			Err(Error::Unauthorized)
		}
	}
}

// RequestScope //
//**************//
impl<S> FromRequestParts<S> for RequestScope
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let Auth(auth) = Auth::from_request_parts(parts, state).await?;

		let target = match parts.headers.get(CLIENT_ID_HEADER) {
			Some(value) => {
				let value = value
					.to_str()
					.map_err(|_| Error::ValidationError("invalid client id header".into()))?
					.trim();
				if value.is_empty() { None } else { Some(AccountId::new(value)) }
			}
			None => None,
		};

		Ok(RequestScope::new(auth.account_id, auth.role, target))
	}
}


// vim: ts=4
