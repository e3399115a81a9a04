// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Edge gatekeeper for page routes.
//!
//! This is the authoritative access check for every page. It runs before
//! routing and either lets the request through or answers with a
//! `303 See Other` redirect:
//!
//! 1. public paths pass untouched
//! 2. no valid session: `/login?redirectTo=<original>` (auth pages pass)
//! 3. the session's expiry is extended, failures are only logged
//! 4. the profile is loaded or created as unassigned
//! 5. `/login` and `/register` with a session: `/dashboard`
//! 6. dashboard paths go through [`role_scoped_decision`]
//! 7. allowed requests carry a [`RequestIdentity`] extension
//!
//! Unexpected store errors follow the configured [`GateFailureMode`].

use axum::{
	body::Body,
	extract::State,
	http::{HeaderMap, Request, Uri},
	middleware::Next,
	response::{IntoResponse, Redirect, Response},
};
use daycare_server_auth::{
	access_denied_redirect, classify_path, login_redirect, normalize_path, role_scoped_decision,
	AccessDeniedReason, GateDecision, PathClass, RequestIdentity,
};
use daycare_server_config::GateFailureMode;
use daycare_server_db::DbError;
use tracing::instrument;

use crate::{
	api::AppState,
	auth_middleware::{ensure_profile, refresh_session, resolve_session},
};

const DASHBOARD_ENTRY: &str = "/dashboard";

#[derive(Debug, PartialEq, Eq)]
enum GateOutcome {
	/// Continue to the route, with an identity when one was resolved.
	Pass(Option<RequestIdentity>),
	Redirect(String),
}

#[instrument(
	name = "gatekeeper",
	skip(state, request, next),
	fields(path = %request.uri().path(), outcome = tracing::field::Empty)
)]
pub async fn gatekeeper(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let path = normalize_path(request.uri().path());
	let class = classify_path(&path);
	let span = tracing::Span::current();

	if class == PathClass::Public {
		span.record("outcome", "public");
		return next.run(request).await;
	}

	let original = original_target(request.uri());
	let outcome = evaluate(&state, request.headers(), &path, class, &original).await;
	match outcome {
		Ok(GateOutcome::Pass(identity)) => {
			span.record("outcome", "allow");
			if let Some(identity) = identity {
				request.extensions_mut().insert(identity);
			}
			next.run(request).await
		}
		Ok(GateOutcome::Redirect(target)) => {
			span.record("outcome", "redirect");
			tracing::debug!(target = %target, "gatekeeper redirect");
			Redirect::to(&target).into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "gatekeeper failed to resolve access");
			match state.auth_config.gate_failure_mode {
				GateFailureMode::Closed => {
					span.record("outcome", "fail_closed");
					Redirect::to(&access_denied_redirect(AccessDeniedReason::Unauthorized))
						.into_response()
				}
				GateFailureMode::Open => {
					span.record("outcome", "fail_open");
					tracing::warn!("gatekeeper failing open, request continues without identity");
					next.run(request).await
				}
			}
		}
	}
}

async fn evaluate(
	state: &AppState,
	headers: &HeaderMap,
	path: &str,
	class: PathClass,
	original: &str,
) -> Result<GateOutcome, DbError> {
	let Some((session, principal)) = resolve_session(state, headers).await? else {
		return Ok(match class {
			PathClass::AuthPage => GateOutcome::Pass(None),
			_ => GateOutcome::Redirect(login_redirect(original)),
		});
	};

	refresh_session(state, &session).await;

	let Some(profile) = ensure_profile(state, &principal).await? else {
		return Ok(GateOutcome::Redirect(access_denied_redirect(
			AccessDeniedReason::Unauthorized,
		)));
	};

	if class == PathClass::AuthPage {
		return Ok(GateOutcome::Redirect(DASHBOARD_ENTRY.to_string()));
	}

	Ok(match role_scoped_decision(&profile, path) {
		GateDecision::Allow => GateOutcome::Pass(Some(RequestIdentity::from_profile(&profile))),
		GateDecision::Redirect(target) => GateOutcome::Redirect(target),
	})
}

/// Path and query as requested, used for the post-login return target.
fn original_target(uri: &Uri) -> String {
	uri.path_and_query()
		.map(|pq| pq.as_str().to_string())
		.unwrap_or_else(|| uri.path().to_string())
}
