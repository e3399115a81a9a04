// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role dashboards.
//!
//! [`DashboardView`] has one variant per role so that every consumer has to
//! handle each role explicitly.

use chrono::NaiveDate;
use daycare_server_auth::{Child, Profile};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::admin::ProfileCountsResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ChildSummary {
	pub id: String,
	pub name: String,
	pub date_of_birth: Option<NaiveDate>,
	pub age_group: Option<String>,
}

impl From<&Child> for ChildSummary {
	fn from(child: &Child) -> Self {
		Self {
			id: child.id.to_string(),
			name: child.name.clone(),
			date_of_birth: child.date_of_birth,
			age_group: child.age_group.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProfileSummary {
	pub id: String,
	pub display_name: String,
	pub email: String,
}

impl From<&Profile> for ProfileSummary {
	fn from(profile: &Profile) -> Self {
		Self {
			id: profile.id.to_string(),
			display_name: profile.display_name.clone(),
			email: profile.email.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AdminDashboard {
	pub counts: ProfileCountsResponse,
	/// Profiles waiting for a role, oldest first.
	pub awaiting_role: Vec<ProfileSummary>,
	pub unread_messages: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TeacherDashboard {
	/// Active children with an active assignment to the viewer.
	pub assigned_children: Vec<ChildSummary>,
	pub unread_messages: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ParentDashboard {
	/// The viewer's active children.
	pub children: Vec<ChildSummary>,
	pub unread_messages: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(tag = "dashboard", rename_all = "snake_case")]
pub enum DashboardView {
	Admin(AdminDashboard),
	Teacher(TeacherDashboard),
	Parent(ParentDashboard),
}

impl DashboardView {
	pub fn unread_messages(&self) -> i64 {
		match self {
			DashboardView::Admin(view) => view.unread_messages,
			DashboardView::Teacher(view) => view.unread_messages,
			DashboardView::Parent(view) => view.unread_messages,
		}
	}
}
