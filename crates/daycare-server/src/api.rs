// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;

use axum::{
	middleware::from_fn_with_state,
	routing::{delete, get, patch, post},
	Router,
};
use daycare_server_config::{AuthConfig, ServerConfig};
use daycare_server_db::{
	CareRepository, CareStore, MessageRepository, MessageStore, ProfileRepository, ProfileStore,
	SessionRepository, SessionStore,
};
use sqlx::SqlitePool;

use crate::{
	auth_middleware::auth_layer, gatekeeper::gatekeeper, messaging::MessagingService, routes,
};

/// Shared state for all handlers. Holds no per-user data.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub session_store: Arc<dyn SessionStore>,
	pub profile_store: Arc<dyn ProfileStore>,
	pub care_store: Arc<dyn CareStore>,
	pub message_store: Arc<dyn MessageStore>,
	pub messaging: Arc<MessagingService>,
	pub auth_config: AuthConfig,
}

pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let session_store: Arc<dyn SessionStore> = Arc::new(SessionRepository::new(pool.clone()));
	let profile_store: Arc<dyn ProfileStore> = Arc::new(ProfileRepository::new(pool.clone()));
	let care_store: Arc<dyn CareStore> = Arc::new(CareRepository::new(pool.clone()));
	let message_store: Arc<dyn MessageStore> = Arc::new(MessageRepository::new(pool.clone()));

	let messaging = Arc::new(MessagingService::new(
		Arc::clone(&profile_store),
		Arc::clone(&care_store),
		Arc::clone(&message_store),
	));

	AppState {
		pool,
		session_store,
		profile_store,
		care_store,
		message_store,
		messaging,
		auth_config: config.auth.clone(),
	}
}

/// Build the full router.
///
/// Page routes and the fallback sit behind the [`gatekeeper`]; API routes
/// authenticate through [`auth_layer`] and the handler extractors. The
/// gatekeeper treats `/api` and `/health` as public.
pub fn create_router(state: AppState) -> Router {
	let pages = Router::new()
		.route("/", get(routes::pages::home))
		.route("/login", get(routes::pages::login))
		.route("/register", get(routes::pages::register))
		.route("/access-denied", get(routes::pages::access_denied))
		.route("/dashboard", get(routes::pages::dashboard_entry))
		.route("/dashboard/admin", get(routes::pages::admin_dashboard))
		.route("/dashboard/teacher", get(routes::pages::teacher_dashboard))
		.route("/dashboard/parent", get(routes::pages::parent_dashboard))
		.route("/dashboard/messages", get(routes::pages::messages_page));

	let api = Router::new()
		.route("/api/messages", post(routes::messages::send_message))
		.route("/api/messages/inbox", get(routes::messages::list_inbox))
		.route("/api/messages/sent", get(routes::messages::list_sent))
		.route(
			"/api/messages/recipients",
			get(routes::messages::list_recipients),
		)
		.route("/api/messages/{id}/read", post(routes::messages::mark_read))
		.route("/api/messages/{id}", delete(routes::messages::delete_message))
		.route("/api/admin/profiles", get(routes::admin::list_profiles))
		.route(
			"/api/admin/profiles/{id}/role",
			patch(routes::admin::update_profile_role),
		)
		.route(
			"/api/admin/profiles/{id}/status",
			patch(routes::admin::update_profile_status),
		)
		.route_layer(from_fn_with_state(state.clone(), auth_layer));

	let public = Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(routes::docs::openapi_json));

	Router::new()
		.merge(pages)
		.merge(api)
		.merge(public)
		.fallback(routes::pages::not_found)
		.layer(from_fn_with_state(state.clone(), gatekeeper))
		.with_state(state)
}
