// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Render-time guard for role-scoped views.
//!
//! This is a second, **non-authoritative** application of the route policy.
//! The edge gatekeeper is the enforcement point; the guard only stops a view
//! from being built for a caller whose role is still loading or who reached
//! the view without passing the gatekeeper (client-side transitions). Never
//! rely on it as the only check: by the time it runs, data loading may
//! already have started.

use crate::gate::{access_denied_redirect, AccessDeniedReason};
use crate::route_policy::is_allowed;
use crate::types::Role;

/// What the guard knows about the viewer's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleState {
	/// The role is still being fetched.
	Loading,
	/// The role is known; `None` means unassigned.
	Resolved(Option<Role>),
}

impl From<Option<Role>> for RoleState {
	fn from(role: Option<Role>) -> Self {
		RoleState::Resolved(role)
	}
}

/// Result of running a view through the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<T> {
	/// Render nothing yet.
	Suspended,
	/// Navigate to the given access-denied target.
	Redirect(String),
	/// The wrapped view.
	Render(T),
}

impl<T> GuardOutcome<T> {
	pub fn into_rendered(self) -> Option<T> {
		match self {
			GuardOutcome::Render(view) => Some(view),
			_ => None,
		}
	}
}

/// Guard for one protected view path.
#[derive(Debug, Clone, Copy)]
pub struct ClientGuard<'a> {
	required_path: &'a str,
}

impl<'a> ClientGuard<'a> {
	pub fn new(required_path: &'a str) -> Self {
		Self { required_path }
	}

	/// Build the view only if `state` allows it. The closure is not invoked
	/// while loading or on denial.
	pub fn render<T>(&self, state: RoleState, view: impl FnOnce(Role) -> T) -> GuardOutcome<T> {
		match state {
			RoleState::Loading => GuardOutcome::Suspended,
			RoleState::Resolved(None) => {
				GuardOutcome::Redirect(access_denied_redirect(AccessDeniedReason::RoleNotAssigned))
			}
			RoleState::Resolved(Some(role)) if !is_allowed(role, self.required_path) => {
				tracing::debug!(
					role = %role,
					path = self.required_path,
					"client guard redirecting"
				);
				GuardOutcome::Redirect(access_denied_redirect(AccessDeniedReason::for_denied_path(
					self.required_path,
				)))
			}
			RoleState::Resolved(Some(role)) => GuardOutcome::Render(view(role)),
		}
	}
}
