// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware for the JSON API.
//!
//! [`auth_layer`] resolves the caller's session and profile and stores a
//! [`RequestIdentity`] in the request extensions. Handlers then use the
//! [`RequireAuth`] or [`OptionalAuth`] extractors.
//!
//! # Security Properties
//!
//! - Session tokens are hashed with SHA-256 before lookup and never logged.
//! - Expired sessions are rejected on every request.
//! - Roles are read from the profile store on every request and never cached.
//!
//! The page routes use the [`crate::gatekeeper`] instead, which shares the
//! session and profile helpers below.

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, HeaderMap, Request},
	middleware::Next,
	response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use daycare_server_auth::{
	extract_session_token, hash_session_token, Principal, Profile, RequestIdentity, Session,
	SESSION_TTL_HOURS,
};
use daycare_server_db::DbError;
use tracing::instrument;

use crate::{
	api::AppState,
	api_response::{forbidden, internal_error, unauthorized},
	error::ErrorResponse,
};

/// Authentication middleware for API routes.
///
/// A missing or expired session leaves the request unauthenticated. A store
/// failure is answered with `500` here, so a signed-in caller is never told
/// to log in again because the database was unreachable.
#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(principal_id = tracing::field::Empty)
)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let resolved = match resolve_session(&state, request.headers()).await {
		Ok(resolved) => resolved,
		Err(e) => {
			tracing::error!(error = %e, "Failed to resolve session");
			return internal_error::<ErrorResponse>("Failed to authenticate request").into_response();
		}
	};

	if let Some((session, principal)) = resolved {
		refresh_session(&state, &session).await;
		match ensure_profile(&state, &principal).await {
			Ok(Some(profile)) => {
				tracing::Span::current().record("principal_id", tracing::field::display(&profile.id));
				request
					.extensions_mut()
					.insert(RequestIdentity::from_profile(&profile));
			}
			Ok(None) => tracing::warn!("Profile could not be created for session"),
			Err(e) => {
				tracing::error!(error = %e, "Failed to load profile");
				return internal_error::<ErrorResponse>("Failed to authenticate request")
					.into_response();
			}
		}
	}

	next.run(request).await
}

/// Look up the session carried by the request's cookie or bearer token.
///
/// Returns `Ok(None)` when no credential is present or the session is
/// unknown or expired.
#[instrument(skip_all)]
pub(crate) async fn resolve_session(
	state: &AppState,
	headers: &HeaderMap,
) -> Result<Option<(Session, Principal)>, DbError> {
	let Some(token) = extract_session_token(headers, &state.auth_config.session_cookie_name) else {
		tracing::debug!("No session credential on request");
		return Ok(None);
	};

	let resolved = state
		.session_store
		.resolve_session(&hash_session_token(&token), Utc::now())
		.await?;
	if resolved.is_none() {
		tracing::debug!("Session not found or expired");
	}
	Ok(resolved)
}

/// Extend a session's expiry. Failures are logged and ignored.
pub(crate) async fn refresh_session(state: &AppState, session: &Session) {
	if let Err(e) = state
		.session_store
		.refresh_session(&session.id, session_ttl(state))
		.await
	{
		tracing::warn!(error = %e, session_id = %session.id, "Failed to refresh session");
	}
}

fn session_ttl(state: &AppState) -> Duration {
	let hours = i64::try_from(state.auth_config.session_ttl_hours).unwrap_or(SESSION_TTL_HOURS);
	Duration::hours(hours)
}

/// Load the principal's profile, creating an unassigned one on first use.
///
/// `last_login_at` is updated best-effort. Returns `Ok(None)` if the profile
/// is missing and could not be created.
#[instrument(skip_all, fields(principal_id = %principal.id))]
pub(crate) async fn ensure_profile(
	state: &AppState,
	principal: &Principal,
) -> Result<Option<Profile>, DbError> {
	let now = Utc::now();

	if let Some(mut profile) = state.profile_store.get_profile(&principal.id).await? {
		match state.profile_store.touch_last_login(&profile.id, now).await {
			Ok(()) => profile.last_login_at = Some(now),
			Err(e) => tracing::warn!(error = %e, "Failed to update last login"),
		}
		return Ok(Some(profile));
	}

	let profile = Profile::unassigned_for(principal, now);
	match state.profile_store.create_profile_if_absent(&profile).await {
		Ok(true) => {
			tracing::info!("Created unassigned profile");
			Ok(Some(profile))
		}
		// Another request created it first.
		Ok(false) => state.profile_store.get_profile(&principal.id).await,
		Err(e) => {
			tracing::error!(error = %e, "Failed to create profile");
			Ok(None)
		}
	}
}

/// Extractor that requires an authenticated, active profile.
///
/// Rejects with `401` when there is no identity and `403` when the profile
/// has been deactivated.
pub struct RequireAuth(pub RequestIdentity);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = Response;

	#[instrument(name = "RequireAuth::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		match parts.extensions.get::<RequestIdentity>().cloned() {
			Some(identity) if identity.active_status => Ok(RequireAuth(identity)),
			Some(identity) => {
				tracing::debug!(principal_id = %identity.principal_id, "Inactive profile rejected");
				Err(forbidden::<ErrorResponse>("account_inactive", "This account has been deactivated")
					.into_response())
			}
			None => {
				tracing::debug!("Authentication required: no valid credentials");
				Err(unauthorized::<ErrorResponse>("unauthorized", "Authentication required")
					.into_response())
			}
		}
	}
}

/// Extractor for optional authentication. Always succeeds.
pub struct OptionalAuth(pub Option<RequestIdentity>);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(OptionalAuth(parts.extensions.get::<RequestIdentity>().cloned()))
	}
}
