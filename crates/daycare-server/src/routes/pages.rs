// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Page handlers.
//!
//! These run behind the gatekeeper, which has already decided access and
//! attached the viewer's [`RequestIdentity`]. Role-scoped pages still pass
//! through a [`ClientGuard`] before any data is loaded. The guard is a
//! rendering safeguard only; it never replaces the gatekeeper.
//!
//! A missing identity on a protected page only happens when the gatekeeper
//! failed open. Those pages render the loading view and load no data.

use axum::{
	extract::{Query, State},
	http::{StatusCode, Uri},
	response::{IntoResponse, Redirect, Response},
	Extension, Json,
};
use daycare_server_api::{
	AccessDeniedPage, AccessDeniedQuery, HomePage, LoadingPage, LoginPage, LoginQuery,
	MessageResponse, MessagesPage, RecipientResponse, RegisterPage,
};
use daycare_server_auth::{
	access_denied_redirect, route_policy::MESSAGES_PREFIX, AccessDeniedReason, ClientGuard,
	GuardOutcome, RequestIdentity, Role, RoleState, LOGIN_PATH, REGISTER_PATH,
};

use crate::{
	api::AppState,
	dashboard::build_dashboard,
	error::ServerError,
};

type Viewer = Option<Extension<RequestIdentity>>;

pub async fn home() -> impl IntoResponse {
	Json(HomePage {
		title: "Daycare".to_string(),
		login_path: LOGIN_PATH.to_string(),
		register_path: REGISTER_PATH.to_string(),
	})
}

pub async fn login(Query(query): Query<LoginQuery>) -> impl IntoResponse {
	Json(LoginPage {
		redirect_to: query.redirect_to.filter(|target| is_local_target(target)),
	})
}

pub async fn register() -> impl IntoResponse {
	Json(RegisterPage {
		login_path: LOGIN_PATH.to_string(),
	})
}

pub async fn access_denied(Query(query): Query<AccessDeniedQuery>) -> impl IntoResponse {
	let reason = query
		.reason
		.and_then(|r| r.parse::<AccessDeniedReason>().ok())
		.unwrap_or(AccessDeniedReason::Unauthorized);

	(
		StatusCode::FORBIDDEN,
		Json(AccessDeniedPage {
			reason: reason.as_str().to_string(),
			message: reason.message().to_string(),
		}),
	)
}

/// `/dashboard` forwards to the viewer's own area.
pub async fn dashboard_entry(viewer: Viewer) -> Response {
	let Some(Extension(viewer)) = viewer else {
		return loading();
	};

	match viewer.role {
		Some(role) => Redirect::to(role.home_path()).into_response(),
		None => Redirect::to(&access_denied_redirect(AccessDeniedReason::RoleNotAssigned))
			.into_response(),
	}
}

pub async fn admin_dashboard(State(state): State<AppState>, viewer: Viewer) -> Response {
	render_dashboard(&state, viewer, Role::Admin).await
}

pub async fn teacher_dashboard(State(state): State<AppState>, viewer: Viewer) -> Response {
	render_dashboard(&state, viewer, Role::Teacher).await
}

pub async fn parent_dashboard(State(state): State<AppState>, viewer: Viewer) -> Response {
	render_dashboard(&state, viewer, Role::Parent).await
}

#[tracing::instrument(skip(state, viewer))]
async fn render_dashboard(state: &AppState, viewer: Viewer, area: Role) -> Response {
	let Some(Extension(viewer)) = viewer else {
		return loading();
	};

	match ClientGuard::new(area.home_path()).render(RoleState::Resolved(viewer.role), |_| ()) {
		GuardOutcome::Suspended => loading(),
		GuardOutcome::Redirect(target) => Redirect::to(&target).into_response(),
		GuardOutcome::Render(()) => match build_dashboard(state, &viewer, area).await {
			Ok(view) => Json(view).into_response(),
			Err(e) => ServerError::from(e).into_response(),
		},
	}
}

pub async fn messages_page(State(state): State<AppState>, viewer: Viewer) -> Response {
	let Some(Extension(viewer)) = viewer else {
		return loading();
	};

	match ClientGuard::new(MESSAGES_PREFIX).render(RoleState::Resolved(viewer.role), |_| ()) {
		GuardOutcome::Suspended => loading(),
		GuardOutcome::Redirect(target) => Redirect::to(&target).into_response(),
		GuardOutcome::Render(()) => match load_messages_page(&state, &viewer).await {
			Ok(page) => Json(page).into_response(),
			Err(e) => ServerError::from(e).into_response(),
		},
	}
}

async fn load_messages_page(
	state: &AppState,
	viewer: &RequestIdentity,
) -> Result<MessagesPage, daycare_server_db::DbError> {
	let inbox = state.messaging.list_inbox(viewer).await?;
	let unread_count = state.messaging.unread_count(viewer).await?;
	let recipients = state.messaging.allowed_recipients(viewer).await?;

	Ok(MessagesPage {
		inbox: inbox.iter().map(MessageResponse::from).collect(),
		unread_count,
		recipients: recipients.iter().map(RecipientResponse::from).collect(),
	})
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
	ServerError::NotFound(uri.path().to_string())
}

fn loading() -> Response {
	Json(LoadingPage::default()).into_response()
}

/// Only same-site absolute paths are honoured as post-login targets.
fn is_local_target(target: &str) -> bool {
	target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
}
