// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Principals and profiles.
//!
//! - [`Principal`] - identity issued by the session provider
//! - [`Profile`] - application record carrying role and active status
//! - [`PublicProfile`] - view of a profile that is safe to show other users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{PrincipalId, Role};

/// An authenticated identity as reported by the session provider.
///
/// The provider owns the principal; this server only reads `id` and `email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	pub id: PrincipalId,
	pub email: String,
}

/// Application-level user record. One per principal.
///
/// # PII Handling
///
/// `display_name` and `email` are user-provided PII and must not be logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	/// Same value as the owning principal's id.
	pub id: PrincipalId,

	/// `None` while the profile is unassigned. Only admins change this.
	pub role: Option<Role>,

	/// Inactive profiles cannot receive messages or enter dashboards.
	pub active_status: bool,

	pub display_name: String,

	pub email: String,

	pub created_at: DateTime<Utc>,

	pub updated_at: DateTime<Utc>,

	/// Set by the system on each gated request.
	pub last_login_at: Option<DateTime<Utc>>,
}

impl Profile {
	/// Build the profile that is auto-created on a principal's first
	/// authenticated request: unassigned and active.
	pub fn unassigned_for(principal: &Principal, now: DateTime<Utc>) -> Self {
		Self {
			id: principal.id,
			role: None,
			active_status: true,
			display_name: default_display_name(&principal.email),
			email: principal.email.clone(),
			created_at: now,
			updated_at: now,
			last_login_at: Some(now),
		}
	}

	/// Returns true if an admin has assigned a role.
	pub fn is_assigned(&self) -> bool {
		self.role.is_some()
	}

	pub fn is_admin(&self) -> bool {
		self.role == Some(Role::Admin)
	}

	pub fn to_public(&self) -> PublicProfile {
		PublicProfile {
			id: self.id,
			display_name: self.display_name.clone(),
			role: self.role,
		}
	}
}

/// What other users may see about a profile (no email).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
	pub id: PrincipalId,
	pub display_name: String,
	pub role: Option<Role>,
}

/// Derive a display name from the local part of an email address.
pub fn default_display_name(email: &str) -> String {
	let local = email.split('@').next().unwrap_or_default().trim();
	if local.is_empty() {
		"New user".to_string()
	} else {
		local.to_string()
	}
}
