//! API routes

use axum::{
	Router, middleware,
	routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::prelude::*;
use crate::{admin, auth};
use fleetward_core::app::VERSION;
use fleetward_core::middleware::{require_admin, require_auth, require_role};
use fleetward_relationship::handler;

fn init_manager(app: &App) -> Router<App> {
	Router::new()
		.route("/api/relationship/clients", get(handler::list_clients).post(handler::post_client))
		.route("/api/relationship/clients/{client_id}/removal", post(handler::post_removal_request))
		.route("/api/relationship/join-requests", get(handler::list_join_requests))
		.route("/api/relationship/join-requests/{client_id}", post(handler::post_join_decision))
		.route("/api/relationship/leave-requests", get(handler::list_leave_requests))
		.route("/api/relationship/leave-requests/{client_id}", post(handler::post_leave_decision))
		.route_layer(middleware::from_fn_with_state(app.clone(), require_role(AccountRole::Manager)))
}

fn init_client(app: &App) -> Router<App> {
	Router::new()
		.route("/api/relationship/join", post(handler::post_join))
		.route("/api/relationship/manager", get(handler::get_manager))
		.route("/api/relationship/leave", post(handler::post_leave))
		.route(
			"/api/relationship/removal",
			get(handler::get_removal).post(handler::post_removal_decision),
		)
		.route_layer(middleware::from_fn_with_state(
			app.clone(),
			require_role(AccountRole::Standalone),
		))
}

fn init_shared() -> Router<App> {
	Router::new()
		.route("/api/relationship", get(handler::get_relationship))
		.route("/api/relationship/managers", get(handler::list_managers))
		// setLimit checks the admin flag itself
		.route(
			"/api/relationship/managers/{manager_id}/limit",
			get(handler::get_limit).put(handler::put_limit),
		)
		.route("/api/relationship/clients/{client_id}", delete(handler::delete_client))
}

fn init_admin(app: &App) -> Router<App> {
	Router::new()
		.route("/api/admin/accounts", post(admin::post_account))
		.route_layer(middleware::from_fn_with_state(app.clone(), require_admin))
}

pub fn init(app: App) -> Router {
	let protected_router = Router::new()
		.merge(init_manager(&app))
		.merge(init_client(&app))
		.merge(init_shared())
		.merge(init_admin(&app))
		.layer(middleware::from_fn_with_state(app.clone(), require_auth));

	let public_router = Router::new()
		.route("/api/auth/login", post(auth::post_login))
		.route("/api/version", get(async || VERSION));

	Router::new()
		.merge(public_router)
		.merge(protected_router)
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
