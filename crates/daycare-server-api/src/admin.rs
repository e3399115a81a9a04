// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use daycare_server_auth::Profile;
use daycare_server_db::ProfileCounts;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::role_name;

/// A profile as seen by administrators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AdminProfileResponse {
	pub id: String,
	pub email: String,
	pub display_name: String,
	/// `admin`, `teacher`, `parent` or `unassigned`.
	pub role: String,
	pub active_status: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&Profile> for AdminProfileResponse {
	fn from(profile: &Profile) -> Self {
		Self {
			id: profile.id.to_string(),
			email: profile.email.clone(),
			display_name: profile.display_name.clone(),
			role: role_name(profile.role),
			active_status: profile.active_status,
			created_at: profile.created_at,
			updated_at: profile.updated_at,
			last_login_at: profile.last_login_at,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProfileCountsResponse {
	pub admin: i64,
	pub teacher: i64,
	pub parent: i64,
	pub unassigned: i64,
	pub inactive: i64,
	pub total: i64,
}

impl From<ProfileCounts> for ProfileCountsResponse {
	fn from(counts: ProfileCounts) -> Self {
		Self {
			admin: counts.admin,
			teacher: counts.teacher,
			parent: counts.parent,
			unassigned: counts.unassigned,
			inactive: counts.inactive,
			total: counts.total(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListProfilesResponse {
	pub profiles: Vec<AdminProfileResponse>,
	pub counts: ProfileCountsResponse,
}

/// Request to change a profile's role. `"unassigned"` clears the role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateRoleRequest {
	pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateStatusRequest {
	pub active_status: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AdminErrorResponse {
	pub error: String,
	pub message: String,
}
