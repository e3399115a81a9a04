// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Static role → path policy.
//!
//! [`is_allowed`] is the single decision function used by both the edge
//! gatekeeper and the client guard. It is pure and total:
//!
//! 1. **Admin**: every path is allowed
//! 2. **Other roles**: the path must equal one of the role's prefixes or
//!    continue it at a `/` boundary
//!
//! Callers must reject unassigned profiles before consulting the policy; the
//! signature only accepts an assignable [`Role`].

use tracing::instrument;

use crate::types::Role;

/// Namespace that holds every role-scoped page.
pub const DASHBOARD_PREFIX: &str = "/dashboard";

/// Shared messaging area, open to every assigned role.
pub const MESSAGES_PREFIX: &str = "/dashboard/messages";

const TEACHER_PREFIXES: &[&str] = &["/dashboard/teacher", MESSAGES_PREFIX];
const PARENT_PREFIXES: &[&str] = &["/dashboard/parent", MESSAGES_PREFIX];

/// Path prefixes a role may visit. Admin is not listed because it matches
/// every path implicitly.
pub fn allowed_prefixes(role: Role) -> &'static [&'static str] {
	match role {
		Role::Admin => &[],
		Role::Teacher => TEACHER_PREFIXES,
		Role::Parent => PARENT_PREFIXES,
	}
}

/// Decide whether `role` may visit `path`.
///
/// `path` is expected to be normalized (see [`normalize_path`]).
#[instrument(level = "trace", ret)]
pub fn is_allowed(role: Role, path: &str) -> bool {
	if role == Role::Admin {
		return true;
	}

	allowed_prefixes(role)
		.iter()
		.any(|prefix| matches_prefix(path, prefix))
}

/// Segment-aware prefix match: `/dashboard/teacher` matches
/// `/dashboard/teacher` and `/dashboard/teacher/roster` but not
/// `/dashboard/teachers-other`.
pub fn matches_prefix(path: &str, prefix: &str) -> bool {
	match path.strip_prefix(prefix) {
		Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
		None => false,
	}
}

/// Returns true if `path` is the dashboard namespace or inside it.
pub fn is_dashboard_path(path: &str) -> bool {
	matches_prefix(path, DASHBOARD_PREFIX)
}

/// Normalize a request path for policy evaluation.
///
/// - drops any query string or fragment
/// - collapses repeated slashes and `.` segments
/// - resolves `..` without escaping the root
/// - removes a trailing slash (the root stays `/`)
pub fn normalize_path(raw: &str) -> String {
	let without_query = raw.split(['?', '#']).next().unwrap_or_default();

	let mut segments: Vec<&str> = Vec::new();
	for segment in without_query.split('/') {
		match segment {
			"" | "." => {}
			".." => {
				segments.pop();
			}
			other => segments.push(other),
		}
	}

	if segments.is_empty() {
		"/".to_string()
	} else {
		format!("/{}", segments.join("/"))
	}
}
