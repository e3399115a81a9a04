// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session credential extraction and the per-request identity.
//!
//! # Credential lookup
//!
//! ```text
//! Request ─► Cookie `daycare_session` ─► found? ─► token
//!                                        └ no ──► Authorization: Bearer <token>
//! ```
//!
//! Raw tokens are never stored or logged: the session table holds
//! [`hash_session_token`] of the value.

use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::profile::Profile;
use crate::types::{PrincipalId, Role};

/// Default name for the session cookie.
pub const SESSION_COOKIE_NAME: &str = "daycare_session";

/// Identity attached to a request that passed the gatekeeper.
///
/// Downstream handlers read this from request extensions instead of
/// re-resolving the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestIdentity {
	pub principal_id: PrincipalId,
	pub email: String,
	/// `None` for unassigned profiles.
	pub role: Option<Role>,
	pub active_status: bool,
}

impl RequestIdentity {
	pub fn from_profile(profile: &Profile) -> Self {
		Self {
			principal_id: profile.id,
			email: profile.email.clone(),
			role: profile.role,
			active_status: profile.active_status,
		}
	}

	pub fn is_admin(&self) -> bool {
		self.role == Some(Role::Admin)
	}
}

/// Extract the session token from the default session cookie.
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
	extract_session_cookie_with_name(headers, SESSION_COOKIE_NAME)
}

/// Extract the session token from the Cookie header with a custom cookie name.
pub fn extract_session_cookie_with_name(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(';'))
		.find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			(name == cookie_name && !value.is_empty()).then(|| value.to_string())
		})
}

/// Extract a bearer token from the Authorization header.
///
/// Expects `Authorization: Bearer <token>`. The returned value is a secret.
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(|token| token.to_string())
}

/// Session token from the cookie, falling back to a bearer token.
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	extract_session_cookie_with_name(headers, cookie_name).or_else(|| extract_bearer_token(headers))
}

/// SHA-256 of a session token, hex encoded. This is the stored form.
pub fn hash_session_token(token: &str) -> String {
	hex::encode(Sha256::digest(token.as_bytes()))
}

/// Generate a fresh opaque session token.
pub fn generate_session_token() -> String {
	format!(
		"ds_{}{}",
		uuid::Uuid::new_v4().simple(),
		uuid::Uuid::new_v4().simple()
	)
}
