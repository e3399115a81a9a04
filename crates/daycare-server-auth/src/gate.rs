// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pure building blocks of the edge gatekeeper.
//!
//! The gatekeeper itself lives in the server crate because it talks to the
//! session and profile stores. Everything here is side-effect free:
//!
//! - [`classify_path`] - public, auth page or protected
//! - [`role_scoped_decision`] - steps taken once the profile is known
//! - [`AccessDeniedReason`] and the redirect target builders
//!
//! # Request flow
//!
//! ```text
//! path ─► classify ─┬─ Public ───────────────────────────────► Allow
//!                   ├─ AuthPage ─ session? ─ yes ─► Redirect(/dashboard)
//!                   │                      └ no ──► Allow
//!                   └─ Protected ─ session? ─ no ─► Redirect(/login?redirectTo=…)
//!                                  └ yes ─► ensure profile ─► role_scoped_decision
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::Profile;
use crate::route_policy::{is_allowed, is_dashboard_path, matches_prefix, DASHBOARD_PREFIX};
use crate::types::Role;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const ACCESS_DENIED_PATH: &str = "/access-denied";

/// Paths served to anyone. `/` is matched exactly; the rest are prefixes.
pub const PUBLIC_PREFIXES: &[&str] = &[
	"/about",
	"/contact",
	"/programs",
	ACCESS_DENIED_PATH,
	"/static",
	"/assets",
	"/favicon.ico",
	"/robots.txt",
	"/api",
	"/health",
];

/// Pages that authenticated users are bounced away from.
pub const AUTH_PAGES: &[&str] = &[LOGIN_PATH, REGISTER_PATH];

/// How the gatekeeper treats a (normalized) path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
	/// Passed through untouched.
	Public,
	/// Login or register: public for anonymous callers only.
	AuthPage,
	/// Requires a session.
	Protected,
}

pub fn classify_path(path: &str) -> PathClass {
	if path == "/" || PUBLIC_PREFIXES.iter().any(|p| matches_prefix(path, p)) {
		PathClass::Public
	} else if AUTH_PAGES.iter().any(|p| matches_prefix(path, p)) {
		PathClass::AuthPage
	} else {
		PathClass::Protected
	}
}

/// Reason carried on the access-denied redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessDeniedReason {
	RoleNotAssigned,
	NotParent,
	NotAdmin,
	Unauthorized,
}

impl AccessDeniedReason {
	pub fn as_str(&self) -> &'static str {
		match self {
			AccessDeniedReason::RoleNotAssigned => "role-not-assigned",
			AccessDeniedReason::NotParent => "not-parent",
			AccessDeniedReason::NotAdmin => "not-admin",
			AccessDeniedReason::Unauthorized => "unauthorized",
		}
	}

	/// Reason to report when the role policy rejects `path`.
	pub fn for_denied_path(path: &str) -> Self {
		if matches_prefix(path, "/dashboard/admin") {
			AccessDeniedReason::NotAdmin
		} else if matches_prefix(path, "/dashboard/parent") {
			AccessDeniedReason::NotParent
		} else {
			AccessDeniedReason::Unauthorized
		}
	}

	/// Human-readable explanation for the access-denied page.
	pub fn message(&self) -> &'static str {
		match self {
			AccessDeniedReason::RoleNotAssigned => {
				"Your account is waiting for an administrator to assign a role."
			}
			AccessDeniedReason::NotParent => "This area is only available to parents.",
			AccessDeniedReason::NotAdmin => "This area is only available to administrators.",
			AccessDeniedReason::Unauthorized => "You do not have access to this page.",
		}
	}
}

impl fmt::Display for AccessDeniedReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for AccessDeniedReason {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"role-not-assigned" => Ok(AccessDeniedReason::RoleNotAssigned),
			"not-parent" => Ok(AccessDeniedReason::NotParent),
			"not-admin" => Ok(AccessDeniedReason::NotAdmin),
			"unauthorized" => Ok(AccessDeniedReason::Unauthorized),
			other => Err(format!("unknown access denied reason: {other}")),
		}
	}
}

/// `/login?redirectTo=<original>` with the original target percent-encoded.
pub fn login_redirect(original: &str) -> String {
	let encoded: String = url::form_urlencoded::byte_serialize(original.as_bytes()).collect();
	format!("{LOGIN_PATH}?redirectTo={encoded}")
}

/// `/access-denied?reason=<reason>`.
pub fn access_denied_redirect(reason: AccessDeniedReason) -> String {
	format!("{ACCESS_DENIED_PATH}?reason={}", reason.as_str())
}

/// Outcome of the gatekeeper for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
	/// Let the request through.
	Allow,
	/// Send the caller elsewhere (303 See Other).
	Redirect(String),
}

impl GateDecision {
	pub fn deny(reason: AccessDeniedReason) -> Self {
		GateDecision::Redirect(access_denied_redirect(reason))
	}

	pub fn is_allow(&self) -> bool {
		matches!(self, GateDecision::Allow)
	}
}

/// Role-scoped check for an authenticated request whose profile is loaded.
///
/// Paths outside the dashboard namespace are allowed for any profile. Inside
/// it: unassigned profiles are sent to access-denied with
/// `role-not-assigned`, inactive profiles with `unauthorized`, the bare
/// `/dashboard` entry point is forwarded to the role's home page and every
/// other path is decided by the role policy.
pub fn role_scoped_decision(profile: &Profile, path: &str) -> GateDecision {
	if !is_dashboard_path(path) {
		return GateDecision::Allow;
	}

	let Some(role) = profile.role else {
		return GateDecision::deny(AccessDeniedReason::RoleNotAssigned);
	};

	if !profile.active_status {
		return GateDecision::deny(AccessDeniedReason::Unauthorized);
	}

	if path == DASHBOARD_PREFIX {
		return GateDecision::Redirect(role.home_path().to_string());
	}

	policy_decision(role, path)
}

/// Apply the role policy and translate a denial into a redirect.
pub fn policy_decision(role: Role, path: &str) -> GateDecision {
	if is_allowed(role, path) {
		GateDecision::Allow
	} else {
		GateDecision::deny(AccessDeniedReason::for_denied_path(path))
	}
}
