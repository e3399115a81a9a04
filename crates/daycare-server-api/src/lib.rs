// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types for the daycare server.
//!
//! Ids are serialized as UUID strings and roles as their stored names, with
//! `"unassigned"` standing in for a profile without a role.

pub mod admin;
pub mod dashboard;
pub mod messages;
pub mod pages;

pub use admin::{
	AdminErrorResponse, AdminProfileResponse, ListProfilesResponse, ProfileCountsResponse,
	UpdateRoleRequest, UpdateStatusRequest,
};
pub use dashboard::{
	AdminDashboard, ChildSummary, DashboardView, ParentDashboard, ProfileSummary, TeacherDashboard,
};
pub use messages::{
	InboxResponse, ListRecipientsResponse, MessageErrorResponse, MessageResponse,
	MessageSuccessResponse, RecipientResponse, SendMessageRequest, SendMessageResponse,
	SentResponse,
};
pub use pages::{
	AccessDeniedPage, AccessDeniedQuery, HomePage, LoadingPage, LoginPage, LoginQuery,
	MessagesPage, RegisterPage,
};

/// Stored name for an optional role.
pub fn role_name(role: Option<daycare_server_auth::Role>) -> String {
	daycare_server_auth::Role::to_stored(role).to_string()
}
