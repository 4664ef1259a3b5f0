//! Relationship operations
//!
//! Every operation first checks that the caller plays the party the action
//! belongs to, then consults the state machine and the capacity rules, and
//! finally commits through a single conditional write of the relationship
//! store. Failures are returned as typed errors; nothing is retried here.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::prelude::*;
use fleetward_core::capacity::{self, LimitStatus};
use fleetward_core::state_machine::{self, Actor};
use fleetward_types::account_directory::{AuthCtx, CreateAccountData};
use fleetward_types::notify_adapter::CredentialNotice;
use fleetward_types::relationship_adapter::{
	Assignment, ClientEntry, ClientStatus, ListClientOptions, RelationshipAction, Transition,
};
use fleetward_types::utils::{random_password, validate_email};

pub const DEFAULT_PAGE_LIMIT: usize = 20;
pub const MAX_PAGE_LIMIT: usize = 100;

/// Answer to a pending join, leave or removal request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
	#[serde(alias = "approve")]
	Accept,
	Reject,
}

// Views //
//*******//
/// Client entry enriched with directory data
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
	#[serde(flatten)]
	pub entry: ClientEntry,
	pub name: Option<Box<str>>,
	pub email: Option<Box<str>>,
}

/// A client's view of its current manager
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerView {
	pub manager_id: AccountId,
	pub name: Option<Box<str>>,
	pub status: ClientStatus,
	pub requested_at: Timestamp,
	pub approved_at: Option<Timestamp>,
}

/// Manager listing item with its capacity
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveManagerView {
	pub id: AccountId,
	pub name: Box<str>,
	pub limit: u32,
	pub active: u32,
	/// True while the manager has a free slot
	pub accepting: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedClient {
	pub account_id: AccountId,
	pub entry: ClientEntry,
}

#[derive(Clone, Debug)]
pub struct ClientPage {
	pub items: Vec<ClientView>,
	pub offset: usize,
	pub limit: usize,
	pub total: usize,
}

/// Account data for a client provisioned by its manager
#[derive(Debug)]
pub struct NewClient<'a> {
	pub name: &'a str,
	pub email: &'a str,
}

/// Filters for listing a manager's clients
#[derive(Debug, Default)]
pub struct ListClientsOptions<'a> {
	/// Defaults to every live status
	pub status: Option<&'a [ClientStatus]>,
	/// Case-insensitive match on the client's name or email
	pub search: Option<&'a str>,
	pub offset: Option<usize>,
	pub limit: Option<usize>,
}

// Helpers //
//*********//
fn is_account(ctx: &AuthCtx, role: AccountRole, id: &AccountId) -> bool {
	ctx.role == role && &ctx.account_id == id
}

/// Fails with `Forbidden` unless the caller is the party `action` belongs to
fn check_actor(
	ctx: &AuthCtx,
	action: RelationshipAction,
	manager_id: &AccountId,
	client_id: &AccountId,
) -> FwResult<()> {
	let allowed = match state_machine::actor(action) {
		Actor::Manager => is_account(ctx, AccountRole::Manager, manager_id),
		Actor::Client => is_account(ctx, AccountRole::Standalone, client_id),
		Actor::Any => {
			ctx.admin
				|| is_account(ctx, AccountRole::Manager, manager_id)
				|| is_account(ctx, AccountRole::Standalone, client_id)
		}
	};

	if !allowed {
		warn!(
			subject = %ctx.account_id,
			role = %ctx.role,
			manager = %manager_id,
			client = %client_id,
			%action,
			"relationship action denied"
		);
		return Err(Error::Forbidden);
	}
	Ok(())
}

/// Manager reading its own data, or a site admin
fn check_manager_read(ctx: &AuthCtx, manager_id: &AccountId) -> FwResult<()> {
	if ctx.admin || is_account(ctx, AccountRole::Manager, manager_id) {
		Ok(())
	} else {
		warn!(subject = %ctx.account_id, manager = %manager_id, "manager data access denied");
		Err(Error::Forbidden)
	}
}

/// Client reading its own data, or a site admin
fn check_client_read(ctx: &AuthCtx, client_id: &AccountId) -> FwResult<()> {
	if ctx.admin || is_account(ctx, AccountRole::Standalone, client_id) {
		Ok(())
	} else {
		warn!(subject = %ctx.account_id, client = %client_id, "client data access denied");
		Err(Error::Forbidden)
	}
}

async fn require_manager_account(app: &App, manager_id: &AccountId) -> FwResult<()> {
	match app.account_directory.read_role(manager_id).await? {
		AccountRole::Manager => Ok(()),
		AccountRole::Standalone => Err(Error::NotFound),
	}
}

async fn current_assignment(app: &App, client_id: &AccountId) -> FwResult<Assignment> {
	app.relationship_adapter.find_assignment(client_id).await?.ok_or(Error::NotFound)
}

/// Inserts or reactivates an entry, subject to uniqueness and capacity
async fn admit(
	app: &App,
	manager_id: &AccountId,
	client_id: &AccountId,
	action: RelationshipAction,
) -> FwResult<ClientEntry> {
	if let Some(assignment) = app.relationship_adapter.find_assignment(client_id).await? {
		debug!(
			client = %client_id,
			manager = %assignment.manager_id,
			status = %assignment.entry.status,
			"client already assigned"
		);
		return Err(Error::AlreadyAssigned);
	}

	let relationship = app
		.relationship_adapter
		.ensure_relationship(manager_id, app.settings.default_client_limit)
		.await?;
	let now = Timestamp::now();
	let step = state_machine::next(relationship.client(client_id).map(|e| e.status), action, now)?;
	capacity::check_capacity(&relationship)?;

	// The store re-checks capacity and uniqueness in the same statement
	let entry = app
		.relationship_adapter
		.admit_client(manager_id, client_id, step.to, now)
		.await
		.inspect_err(|err| {
			warn!(manager = %manager_id, client = %client_id, %action, error = %err, "admission failed");
		})?;

	info!(
		manager = %manager_id,
		client = %client_id,
		%action,
		status = %entry.status,
		entry_id = entry.entry_id,
		"client admitted"
	);
	Ok(entry)
}

/// Applies a non-admission action to an existing entry
async fn transition(
	app: &App,
	manager_id: &AccountId,
	client_id: &AccountId,
	action: RelationshipAction,
) -> FwResult<ClientEntry> {
	let current = app.relationship_adapter.read_client(manager_id, client_id).await?;
	let step = state_machine::next(Some(current.status), action, Timestamp::now()).inspect_err(
		|err| debug!(manager = %manager_id, client = %client_id, error = %err, "transition rejected"),
	)?;

	let entry = app
		.relationship_adapter
		.transition_client(Transition {
			manager_id,
			client_id,
			from: current.status,
			to: step.to,
			approved_at: step.approved_at,
		})
		.await
		.inspect_err(|err| {
			warn!(manager = %manager_id, client = %client_id, %action, error = %err, "transition failed");
		})?;

	info!(
		manager = %manager_id,
		client = %client_id,
		%action,
		from = %current.status,
		to = %entry.status,
		"relationship updated"
	);
	Ok(entry)
}

async fn client_views(app: &App, entries: Vec<ClientEntry>) -> FwResult<Vec<ClientView>> {
	let mut views = Vec::with_capacity(entries.len());
	for entry in entries {
		let (name, email) = match app.account_directory.read_account(&entry.client_id).await {
			Ok(account) => (Some(account.name), Some(account.email)),
			Err(Error::NotFound) => (None, None),
			Err(err) => return Err(err),
		};
		views.push(ClientView { entry, name, email });
	}
	Ok(views)
}

async fn manager_view(app: &App, assignment: Assignment) -> FwResult<ManagerView> {
	let name = match app.account_directory.read_account(&assignment.manager_id).await {
		Ok(account) => Some(account.name),
		Err(Error::NotFound) => None,
		Err(err) => return Err(err),
	};
	Ok(ManagerView {
		manager_id: assignment.manager_id,
		name,
		status: assignment.entry.status,
		requested_at: assignment.entry.requested_at,
		approved_at: assignment.entry.approved_at,
	})
}

async fn list_by_status(
	app: &App,
	manager_id: &AccountId,
	status: ClientStatus,
) -> FwResult<Vec<ClientView>> {
	let entries = app
		.relationship_adapter
		.list_clients(manager_id, &ListClientOptions { status: Some(&[status]) })
		.await?;
	client_views(app, entries).await
}

fn decision_action(
	verdict: Verdict,
	accept: RelationshipAction,
	reject: RelationshipAction,
) -> RelationshipAction {
	match verdict {
		Verdict::Accept => accept,
		Verdict::Reject => reject,
	}
}

// Manager operations //
//********************//
/// Provisions a new standalone account and admits it directly as `APPROVED`
///
/// Capacity is checked before provisioning. If the admission fails afterwards
/// the provisioned account is removed again. Credentials are delivered in the
/// background; delivery failures are only logged.
pub async fn create_client(
	app: &App,
	ctx: &AuthCtx,
	manager_id: &AccountId,
	client: NewClient<'_>,
) -> FwResult<CreatedClient> {
	if !is_account(ctx, AccountRole::Manager, manager_id) {
		warn!(subject = %ctx.account_id, manager = %manager_id, "client creation denied");
		return Err(Error::Forbidden);
	}
	let name = client.name.trim();
	if name.is_empty() {
		return Err(Error::ValidationError("name must not be empty".into()));
	}
	let email = client.email.trim();
	validate_email(email)?;

	let relationship = app
		.relationship_adapter
		.ensure_relationship(manager_id, app.settings.default_client_limit)
		.await?;
	capacity::check_capacity(&relationship)?;

	let password = random_password(app.settings.credential_length)?;
	let account_id = app
		.account_directory
		.create_account(CreateAccountData {
			name,
			email,
			password: &password,
			role: AccountRole::Standalone,
			admin: false,
		})
		.await
		.inspect_err(|err| warn!(manager = %manager_id, error = %err, "client provisioning failed"))?;

	let entry = match admit(app, manager_id, &account_id, RelationshipAction::DirectCreate).await {
		Ok(entry) => entry,
		Err(err) => {
			if let Err(del_err) = app.account_directory.delete_account(&account_id).await {
				error!(
					account = %account_id,
					error = %del_err,
					"failed to remove account after rejected admission"
				);
			}
			return Err(err);
		}
	};

	let notice = CredentialNotice {
		account_id: account_id.clone(),
		name: name.into(),
		email: email.into(),
		password: password.into(),
		manager_id: manager_id.clone(),
	};
	let notifier = app.notifier.clone();
	tokio::spawn(async move {
		if let Err(err) = notifier.send_credentials(&notice).await {
			warn!(account = %notice.account_id, error = %err, "credential delivery failed");
		}
	});

	Ok(CreatedClient { account_id, entry })
}

/// Lists a manager's clients with filtering and pagination
pub async fn list_clients(
	app: &App,
	ctx: &AuthCtx,
	manager_id: &AccountId,
	opts: &ListClientsOptions<'_>,
) -> FwResult<ClientPage> {
	check_manager_read(ctx, manager_id)?;

	let status = opts.status.unwrap_or(&ClientStatus::LIVE[..]);
	let entries = app
		.relationship_adapter
		.list_clients(manager_id, &ListClientOptions { status: Some(status) })
		.await?;
	let mut views = client_views(app, entries).await?;

	if let Some(search) = opts.search.map(str::trim).filter(|s| !s.is_empty()) {
		let needle = search.to_lowercase();
		let matches = |field: &Option<Box<str>>| {
			field.as_deref().is_some_and(|value| value.to_lowercase().contains(&needle))
		};
		views.retain(|view| matches(&view.name) || matches(&view.email));
	}

	let total = views.len();
	let offset = opts.offset.unwrap_or(0);
	let limit = opts.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
	let items = views.into_iter().skip(offset).take(limit).collect();

	Ok(ClientPage { items, offset, limit, total })
}

pub async fn list_pending_join_requests(
	app: &App,
	ctx: &AuthCtx,
	manager_id: &AccountId,
) -> FwResult<Vec<ClientView>> {
	check_manager_read(ctx, manager_id)?;
	list_by_status(app, manager_id, ClientStatus::Pending).await
}

pub async fn decide_join_request(
	app: &App,
	ctx: &AuthCtx,
	manager_id: &AccountId,
	client_id: &AccountId,
	verdict: Verdict,
) -> FwResult<ClientEntry> {
	let action =
		decision_action(verdict, RelationshipAction::ApproveJoin, RelationshipAction::RejectJoin);
	check_actor(ctx, action, manager_id, client_id)?;
	transition(app, manager_id, client_id, action).await
}

pub async fn list_leave_requests(
	app: &App,
	ctx: &AuthCtx,
	manager_id: &AccountId,
) -> FwResult<Vec<ClientView>> {
	check_manager_read(ctx, manager_id)?;
	list_by_status(app, manager_id, ClientStatus::LeaveRequested).await
}

pub async fn decide_leave_request(
	app: &App,
	ctx: &AuthCtx,
	manager_id: &AccountId,
	client_id: &AccountId,
	verdict: Verdict,
) -> FwResult<ClientEntry> {
	let action =
		decision_action(verdict, RelationshipAction::AcceptLeave, RelationshipAction::RejectLeave);
	check_actor(ctx, action, manager_id, client_id)?;
	transition(app, manager_id, client_id, action).await
}

pub async fn request_removal(
	app: &App,
	ctx: &AuthCtx,
	manager_id: &AccountId,
	client_id: &AccountId,
) -> FwResult<ClientEntry> {
	check_actor(ctx, RelationshipAction::RequestRemoval, manager_id, client_id)?;
	transition(app, manager_id, client_id, RelationshipAction::RequestRemoval).await
}

/// Usage of a manager's slots. Managers without a relationship report the default limit.
pub async fn get_limit_status(
	app: &App,
	ctx: &AuthCtx,
	manager_id: &AccountId,
) -> FwResult<LimitStatus> {
	check_manager_read(ctx, manager_id)?;

	match app.relationship_adapter.read_relationship(manager_id).await {
		Ok(relationship) => Ok(LimitStatus::of(&relationship)),
		Err(Error::NotFound) => Ok(LimitStatus::new(app.settings.default_client_limit, 0)),
		Err(err) => Err(err),
	}
}

/// Sets a manager's client limit. Existing clients are never revoked by a lower limit.
pub async fn set_limit(
	app: &App,
	ctx: &AuthCtx,
	manager_id: &AccountId,
	limit: u32,
) -> FwResult<LimitStatus> {
	if !ctx.admin {
		warn!(subject = %ctx.account_id, manager = %manager_id, "limit change denied");
		return Err(Error::Forbidden);
	}
	capacity::validate_limit(limit, &app.settings)?;
	require_manager_account(app, manager_id).await?;

	app.relationship_adapter.update_client_limit(manager_id, limit).await?;
	let relationship = app.relationship_adapter.read_relationship(manager_id).await?;
	let status = LimitStatus::of(&relationship);

	info!(
		admin = %ctx.account_id,
		manager = %manager_id,
		limit,
		active = status.active,
		"client limit changed"
	);
	Ok(status)
}

// Client operations //
//*******************//
/// A standalone account asks to be managed by `manager_id`
pub async fn request_join(
	app: &App,
	ctx: &AuthCtx,
	client_id: &AccountId,
	manager_id: &AccountId,
) -> FwResult<ClientEntry> {
	check_actor(ctx, RelationshipAction::RequestJoin, manager_id, client_id)?;
	require_manager_account(app, manager_id).await?;
	admit(app, manager_id, client_id, RelationshipAction::RequestJoin).await
}

/// The client's live relationship, if any
pub async fn get_manager_for_client(
	app: &App,
	ctx: &AuthCtx,
	client_id: &AccountId,
) -> FwResult<Option<ManagerView>> {
	check_client_read(ctx, client_id)?;

	match app.relationship_adapter.find_assignment(client_id).await? {
		Some(assignment) => Ok(Some(manager_view(app, assignment).await?)),
		None => Ok(None),
	}
}

pub async fn request_leave(
	app: &App,
	ctx: &AuthCtx,
	client_id: &AccountId,
) -> FwResult<ClientEntry> {
	let assignment = current_assignment(app, client_id).await?;
	check_actor(ctx, RelationshipAction::RequestLeave, &assignment.manager_id, client_id)?;
	transition(app, &assignment.manager_id, client_id, RelationshipAction::RequestLeave).await
}

/// The manager's removal request awaiting the client's answer, if any
pub async fn get_pending_removal(
	app: &App,
	ctx: &AuthCtx,
	client_id: &AccountId,
) -> FwResult<Option<ManagerView>> {
	check_client_read(ctx, client_id)?;

	match app.relationship_adapter.find_assignment(client_id).await? {
		Some(assignment) if assignment.entry.status == ClientStatus::RemoveRequested => {
			Ok(Some(manager_view(app, assignment).await?))
		}
		_ => Ok(None),
	}
}

pub async fn decide_removal(
	app: &App,
	ctx: &AuthCtx,
	client_id: &AccountId,
	verdict: Verdict,
) -> FwResult<ClientEntry> {
	let action = decision_action(
		verdict,
		RelationshipAction::AcceptRemoval,
		RelationshipAction::RejectRemoval,
	);
	let assignment = current_assignment(app, client_id).await?;
	check_actor(ctx, action, &assignment.manager_id, client_id)?;
	transition(app, &assignment.manager_id, client_id, action).await
}

// Shared operations //
//*******************//
/// Ends a client's live relationship from any live status
///
/// Allowed for the holding manager, the client itself and site admins.
pub async fn revoke_client(
	app: &App,
	ctx: &AuthCtx,
	client_id: &AccountId,
) -> FwResult<ClientEntry> {
	let assignment = current_assignment(app, client_id).await?;
	check_actor(ctx, RelationshipAction::Revoke, &assignment.manager_id, client_id)?;
	transition(app, &assignment.manager_id, client_id, RelationshipAction::Revoke).await
}

/// Active managers with their current capacity
pub async fn list_active_managers(app: &App) -> FwResult<Vec<ActiveManagerView>> {
	let managers = app.account_directory.list_active_managers().await?;

	let mut views = Vec::with_capacity(managers.len());
	for manager in managers {
		let status = match app.relationship_adapter.read_relationship(&manager.id).await {
			Ok(relationship) => LimitStatus::of(&relationship),
			Err(Error::NotFound) => LimitStatus::new(app.settings.default_client_limit, 0),
			Err(err) => return Err(err),
		};
		views.push(ActiveManagerView {
			id: manager.id,
			name: manager.name,
			limit: status.limit,
			active: status.active,
			accepting: !status.at_capacity,
		});
	}
	Ok(views)
}


// vim: ts=4
