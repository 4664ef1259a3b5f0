//! Error type shared by every Fleetward crate.
//!
//! Domain failures (`NotFound`, `InvalidTransition`, `CapacityExceeded`,
//! `AlreadyAssigned`, `Forbidden`, `ConflictingWrite`) are expected results and
//! map to 4xx responses. Storage and internal failures map to 5xx and never
//! expose their cause to the client.

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};

use crate::relationship_adapter::{ClientStatus, RelationshipAction};

pub type FwResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// No relationship or entry matches the request
	NotFound,
	/// The action is not legal from the entry's current status (`None`: no entry)
	InvalidTransition { status: Option<ClientStatus>, action: RelationshipAction },
	/// The manager has no free client slot
	CapacityExceeded { limit: u32, current: u32 },
	/// The client already has a live relationship
	AlreadyAssigned,
	/// Role mismatch or missing relationship
	Forbidden,
	/// The entry changed between read and conditional write
	ConflictingWrite,
	/// Missing or invalid credentials
	Unauthorized,
	ValidationError(String),
	DbError,
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Stable machine readable code sent to clients
	pub fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-NOT-FOUND",
			Error::InvalidTransition { .. } => "E-INVALID-TRANSITION",
			Error::CapacityExceeded { .. } => "E-CAPACITY-EXCEEDED",
			Error::AlreadyAssigned => "E-ALREADY-ASSIGNED",
			Error::Forbidden => "E-FORBIDDEN",
			Error::ConflictingWrite => "E-CONFLICT",
			Error::Unauthorized => "E-UNAUTHORIZED",
			Error::ValidationError(_) => "E-VALIDATION",
			Error::DbError => "E-STORAGE",
			Error::Internal(_) | Error::Io(_) => "E-INTERNAL",
		}
	}

	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::InvalidTransition { .. }
			| Error::CapacityExceeded { .. }
			| Error::AlreadyAssigned
			| Error::ConflictingWrite => StatusCode::CONFLICT,
			Error::Forbidden => StatusCode::FORBIDDEN,
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
			Error::DbError => StatusCode::SERVICE_UNAVAILABLE,
			Error::Internal(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::InvalidTransition { status: Some(status), action } => {
				write!(f, "cannot {} a client in status {}", action, status)
			}
			Error::InvalidTransition { status: None, action } => {
				write!(f, "cannot {} without a client entry", action)
			}
			Error::CapacityExceeded { limit, current } => {
				write!(f, "client limit reached ({}/{})", current, limit)
			}
			Error::AlreadyAssigned => write!(f, "client already has a manager"),
			Error::Forbidden => write!(f, "forbidden"),
			Error::ConflictingWrite => write!(f, "relationship changed concurrently"),
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::DbError => write!(f, "storage unavailable"),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status_code();
		let message = match &self {
			// Infrastructure faults are logged where they happen, not leaked
			Error::DbError | Error::Internal(_) | Error::Io(_) => {
				tracing::error!(error = %self, "request failed");
				"internal error".to_string()
			}
			_ => self.to_string(),
		};
		let mut body = serde_json::json!({
			"error": { "code": self.code(), "message": message }
		});
		if let Error::CapacityExceeded { limit, current } = self {
			body["error"]["limit"] = limit.into();
			body["error"]["current"] = current.into();
		}
		(status, Json(body)).into_response()
	}
}


// vim: ts=4
