//! Custom middlewares

use axum::{
	body::Body,
	extract::{Request, State},
	http::header,
	middleware::Next,
	response::Response,
};
use std::future::Future;
use std::pin::Pin;

use crate::extract::Auth;
use crate::ownership::{RequestScope, is_approved_client};
use crate::prelude::*;

/// Boxed future returned by middleware factories
pub type PermissionCheckOutput = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send>>;

/// Resolves the bearer token into an [`Auth`] request extension
pub async fn require_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> FwResult<Response> {
	let token = req
		.headers()
		.get(header::AUTHORIZATION)
		.and_then(|h| h.to_str().ok())
		.and_then(|h| h.strip_prefix("Bearer "))
		.map(str::trim)
		.filter(|t| !t.is_empty())
		.ok_or(Error::Unauthorized)?;

	let auth_ctx = app.account_directory.validate_access_token(token).await?;
	req.extensions_mut().insert(Auth(auth_ctx));

	Ok(next.run(req).await)
}

/// Middleware factory restricting a route to one account role
pub fn require_role(
	role: AccountRole,
) -> impl Fn(State<App>, Auth, Request, Next) -> PermissionCheckOutput + Clone {
	move |state, auth, req, next| Box::pin(check_role(state, auth, req, next, role))
}

async fn check_role(
	State(_app): State<App>,
	Auth(auth_ctx): Auth,
	req: Request,
	next: Next,
	role: AccountRole,
) -> Result<Response, Error> {
	if auth_ctx.role != role {
		warn!(
			subject = %auth_ctx.account_id,
			role = %auth_ctx.role,
			required = %role,
			"role check denied"
		);
		return Err(Error::Forbidden);
	}

	Ok(next.run(req).await)
}

/// Restricts a route to site administrators
pub async fn require_admin(
	State(_app): State<App>,
	Auth(auth_ctx): Auth,
	req: Request,
	next: Next,
) -> Result<Response, Error> {
	if !auth_ctx.admin {
		warn!(subject = %auth_ctx.account_id, "admin permission denied");
		return Err(Error::Forbidden);
	}

	Ok(next.run(req).await)
}

/// Short-circuits manager requests that do not target an approved client
///
/// Standalone callers pass through; their records are checked per record.
pub async fn require_approved_client(
	State(app): State<App>,
	scope: RequestScope,
	req: Request,
	next: Next,
) -> Result<Response, Error> {
	if let RequestScope::Manager { manager_id, client_id } = &scope {
		let Some(client_id) = client_id else {
			warn!(manager = %manager_id, "manager request without target client");
			return Err(Error::Forbidden);
		};
		if !is_approved_client(&app, manager_id, client_id).await? {
			warn!(manager = %manager_id, client = %client_id, "client not approved for manager");
			return Err(Error::Forbidden);
		}
	}

	Ok(next.run(req).await)
}

// vim: ts=4
