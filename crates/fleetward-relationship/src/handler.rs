//! Relationship API handlers
//!
//! The authenticated caller is always one side of the relationship, so its
//! id fills the manager or client parameter of the service operation.

use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::prelude::*;
use crate::service::{
	self, ActiveManagerView, ClientView, CreatedClient, ListClientsOptions, ManagerView, NewClient,
	Verdict,
};
use fleetward_core::capacity::LimitStatus;
use fleetward_core::extract::Auth;
use fleetward_types::relationship_adapter::{ClientEntry, ClientStatus};
use fleetward_types::types::ApiResponse;

type ApiResult<T> = FwResult<(StatusCode, Json<ApiResponse<T>>)>;

fn ok<T>(data: T) -> ApiResult<T> {
	Ok((StatusCode::OK, Json(ApiResponse::new(data))))
}

// Requests //
//**********//
#[derive(Debug, Default, Deserialize)]
pub struct ListClientsQuery {
	/// Comma separated status names, e.g. `PENDING,APPROVED`
	pub status: Option<String>,
	pub q: Option<String>,
	pub offset: Option<usize>,
	pub limit: Option<usize>,
}

impl ListClientsQuery {
	fn parse_status(&self) -> FwResult<Option<Vec<ClientStatus>>> {
		let Some(status) = self.status.as_deref() else {
			return Ok(None);
		};
		status
			.split(',')
			.filter(|part| !part.trim().is_empty())
			.map(str::parse::<ClientStatus>)
			.collect::<FwResult<Vec<_>>>()
			.map(Some)
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
	pub name: String,
	pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
	pub manager_id: AccountId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
	pub decision: Verdict,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLimitRequest {
	pub limit: u32,
}

// Role dispatch //
//***************//
/// GET /api/relationship - roster for managers, current manager for standalone accounts
pub async fn get_relationship(
	State(app): State<App>,
	Auth(auth): Auth,
	query: Query<ListClientsQuery>,
) -> FwResult<Response> {
	match auth.role {
		AccountRole::Manager => {
			Ok(list_clients(State(app), Auth(auth), query).await?.into_response())
		}
		AccountRole::Standalone => Ok(get_manager(State(app), Auth(auth)).await?.into_response()),
	}
}

// Manager endpoints //
//*******************//
/// POST /api/relationship/clients - provision a client account and admit it
pub async fn post_client(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<CreateClientRequest>,
) -> ApiResult<CreatedClient> {
	info!(manager = %auth.account_id, "POST /api/relationship/clients");

	let created = service::create_client(
		&app,
		&auth,
		&auth.account_id,
		NewClient { name: &req.name, email: &req.email },
	)
	.await?;

	Ok((StatusCode::CREATED, Json(ApiResponse::new(created))))
}

/// GET /api/relationship/clients
pub async fn list_clients(
	State(app): State<App>,
	Auth(auth): Auth,
	Query(query): Query<ListClientsQuery>,
) -> ApiResult<Vec<ClientView>> {
	let status = query.parse_status()?;
	let opts = ListClientsOptions {
		status: status.as_deref(),
		search: query.q.as_deref(),
		offset: query.offset,
		limit: query.limit,
	};
	let page = service::list_clients(&app, &auth, &auth.account_id, &opts).await?;

	Ok((
		StatusCode::OK,
		Json(ApiResponse::with_pagination(page.items, page.offset, page.limit, page.total)),
	))
}

/// GET /api/relationship/join-requests
pub async fn list_join_requests(
	State(app): State<App>,
	Auth(auth): Auth,
) -> ApiResult<Vec<ClientView>> {
	ok(service::list_pending_join_requests(&app, &auth, &auth.account_id).await?)
}

/// POST /api/relationship/join-requests/{client_id}
pub async fn post_join_decision(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(client_id): Path<AccountId>,
	Json(req): Json<DecisionRequest>,
) -> ApiResult<ClientEntry> {
	ok(service::decide_join_request(&app, &auth, &auth.account_id, &client_id, req.decision)
		.await?)
}

/// GET /api/relationship/leave-requests
pub async fn list_leave_requests(
	State(app): State<App>,
	Auth(auth): Auth,
) -> ApiResult<Vec<ClientView>> {
	ok(service::list_leave_requests(&app, &auth, &auth.account_id).await?)
}

/// POST /api/relationship/leave-requests/{client_id}
pub async fn post_leave_decision(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(client_id): Path<AccountId>,
	Json(req): Json<DecisionRequest>,
) -> ApiResult<ClientEntry> {
	ok(service::decide_leave_request(&app, &auth, &auth.account_id, &client_id, req.decision)
		.await?)
}

/// POST /api/relationship/clients/{client_id}/removal
pub async fn post_removal_request(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(client_id): Path<AccountId>,
) -> ApiResult<ClientEntry> {
	ok(service::request_removal(&app, &auth, &auth.account_id, &client_id).await?)
}

/// DELETE /api/relationship/clients/{client_id}
pub async fn delete_client(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(client_id): Path<AccountId>,
) -> ApiResult<ClientEntry> {
	ok(service::revoke_client(&app, &auth, &client_id).await?)
}

/// GET /api/relationship/managers/{manager_id}/limit
pub async fn get_limit(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(manager_id): Path<AccountId>,
) -> ApiResult<LimitStatus> {
	ok(service::get_limit_status(&app, &auth, &manager_id).await?)
}

/// PUT /api/relationship/managers/{manager_id}/limit - site admins only
pub async fn put_limit(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(manager_id): Path<AccountId>,
	Json(req): Json<SetLimitRequest>,
) -> ApiResult<LimitStatus> {
	ok(service::set_limit(&app, &auth, &manager_id, req.limit).await?)
}

// Client endpoints //
//******************//
/// POST /api/relationship/join
pub async fn post_join(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<JoinRequest>,
) -> ApiResult<ClientEntry> {
	info!(client = %auth.account_id, manager = %req.manager_id, "POST /api/relationship/join");
	let entry = service::request_join(&app, &auth, &auth.account_id, &req.manager_id).await?;
	Ok((StatusCode::CREATED, Json(ApiResponse::new(entry))))
}

/// GET /api/relationship/manager
pub async fn get_manager(
	State(app): State<App>,
	Auth(auth): Auth,
) -> ApiResult<Option<ManagerView>> {
	ok(service::get_manager_for_client(&app, &auth, &auth.account_id).await?)
}

/// POST /api/relationship/leave
pub async fn post_leave(State(app): State<App>, Auth(auth): Auth) -> ApiResult<ClientEntry> {
	ok(service::request_leave(&app, &auth, &auth.account_id).await?)
}

/// GET /api/relationship/removal
pub async fn get_removal(
	State(app): State<App>,
	Auth(auth): Auth,
) -> ApiResult<Option<ManagerView>> {
	ok(service::get_pending_removal(&app, &auth, &auth.account_id).await?)
}

/// POST /api/relationship/removal
pub async fn post_removal_decision(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<DecisionRequest>,
) -> ApiResult<ClientEntry> {
	ok(service::decide_removal(&app, &auth, &auth.account_id, req.decision).await?)
}

// Shared endpoints //
//******************//
/// GET /api/relationship/managers
pub async fn list_managers(
	State(app): State<App>,
	Auth(_auth): Auth,
) -> ApiResult<Vec<ActiveManagerView>> {
	ok(service::list_active_managers(&app).await?)
}


// vim: ts=4
