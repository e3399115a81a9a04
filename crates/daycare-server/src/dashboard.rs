// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dashboard view models.
//!
//! Each area has its own [`DashboardView`] variant. The data is always
//! scoped to the viewer in the store query, never filtered afterwards.

use daycare_server_api::{
	AdminDashboard, ChildSummary, DashboardView, ParentDashboard, ProfileCountsResponse,
	ProfileSummary, TeacherDashboard,
};
use daycare_server_auth::{RequestIdentity, Role};
use daycare_server_db::DbError;
use tracing::instrument;

use crate::api::AppState;

/// Build the dashboard for `area` as seen by `viewer`.
#[instrument(skip(state, viewer), fields(principal_id = %viewer.principal_id))]
pub async fn build_dashboard(
	state: &AppState,
	viewer: &RequestIdentity,
	area: Role,
) -> Result<DashboardView, DbError> {
	let unread_messages = state
		.message_store
		.count_unread(&viewer.principal_id)
		.await?;

	let view = match area {
		Role::Admin => {
			let counts = state.profile_store.count_profiles().await?;
			let awaiting_role = state.profile_store.list_unassigned_profiles().await?;
			DashboardView::Admin(AdminDashboard {
				counts: ProfileCountsResponse::from(counts),
				awaiting_role: awaiting_role.iter().map(ProfileSummary::from).collect(),
				unread_messages,
			})
		}
		Role::Teacher => {
			let children = state
				.care_store
				.list_active_children_for_teacher(&viewer.principal_id)
				.await?;
			DashboardView::Teacher(TeacherDashboard {
				assigned_children: children.iter().map(ChildSummary::from).collect(),
				unread_messages,
			})
		}
		Role::Parent => {
			let children = state
				.care_store
				.list_active_children_for_parent(&viewer.principal_id)
				.await?;
			DashboardView::Parent(ParentDashboard {
				children: children.iter().map(ChildSummary::from).collect(),
				unread_messages,
			})
		}
	};

	Ok(view)
}
