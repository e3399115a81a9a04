// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Admin HTTP handlers.
//!
//! Every endpoint here requires the caller's profile to hold the admin role.
//! Admins cannot demote or deactivate themselves.
//!
//! | Endpoint                | Effect                                   |
//! |-------------------------|------------------------------------------|
//! | `list_profiles`         | all profiles plus per-role counts        |
//! | `update_profile_role`   | assign a role, or `unassigned`           |
//! | `update_profile_status` | activate or deactivate a profile         |

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use daycare_server_auth::{RequestIdentity, Role};
use daycare_server_db::DbError;

pub use daycare_server_api::{
	AdminErrorResponse, AdminProfileResponse, ListProfilesResponse, ProfileCountsResponse,
	UpdateRoleRequest, UpdateStatusRequest,
};

use crate::{
	api::AppState,
	api_response::{bad_request, forbidden, internal_error, not_found, role_parse_error},
	auth_middleware::RequireAuth,
	parse_id,
	validation::{parse_principal_id, parse_role_name},
};

fn require_admin(identity: &RequestIdentity) -> Result<(), Response> {
	if identity.is_admin() {
		return Ok(());
	}
	tracing::warn!(actor_id = %identity.principal_id, "Non-admin attempted admin operation");
	Err(forbidden::<AdminErrorResponse>("forbidden", "Administrator role required").into_response())
}

fn update_error(e: DbError) -> Response {
	match e {
		DbError::NotFound(_) => not_found::<AdminErrorResponse>("Profile not found").into_response(),
		e => {
			tracing::error!(error = %e, "Failed to update profile");
			internal_error::<AdminErrorResponse>("Failed to update profile").into_response()
		}
	}
}

/// List all profiles with role counts.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid authentication
/// - `403 Forbidden`: Caller is not an admin
/// - `500 Internal Server Error`: Database error
#[utoipa::path(
    get,
    path = "/api/admin/profiles",
    responses(
        (status = 200, description = "All profiles", body = ListProfilesResponse),
        (status = 401, description = "Not authenticated", body = AdminErrorResponse),
        (status = 403, description = "Admin role required", body = AdminErrorResponse)
    ),
    tag = "admin"
)]
#[tracing::instrument(skip(state, identity), fields(actor_id = %identity.principal_id))]
pub async fn list_profiles(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
) -> impl IntoResponse {
	if let Err(response) = require_admin(&identity) {
		return response;
	}

	let profiles = match state.profile_store.list_profiles().await {
		Ok(profiles) => profiles,
		Err(e) => {
			tracing::error!(error = %e, "Failed to list profiles");
			return internal_error::<AdminErrorResponse>("Failed to list profiles").into_response();
		}
	};
	let counts = match state.profile_store.count_profiles().await {
		Ok(counts) => counts,
		Err(e) => {
			tracing::error!(error = %e, "Failed to count profiles");
			return internal_error::<AdminErrorResponse>("Failed to list profiles").into_response();
		}
	};

	(
		StatusCode::OK,
		Json(ListProfilesResponse {
			profiles: profiles.iter().map(AdminProfileResponse::from).collect(),
			counts: ProfileCountsResponse::from(counts),
		}),
	)
		.into_response()
}

/// Assign a role to a profile, or clear it with `"unassigned"`.
#[utoipa::path(
    patch,
    path = "/api/admin/profiles/{id}/role",
    params(("id" = String, Path, description = "Profile ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = AdminProfileResponse),
        (status = 400, description = "Invalid role or self-demotion", body = AdminErrorResponse),
        (status = 403, description = "Admin role required", body = AdminErrorResponse),
        (status = 404, description = "Profile not found", body = AdminErrorResponse)
    ),
    tag = "admin"
)]
#[tracing::instrument(
	skip(state, identity, payload),
	fields(actor_id = %identity.principal_id, target_id = %id, role = %payload.role)
)]
pub async fn update_profile_role(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateRoleRequest>,
) -> impl IntoResponse {
	if let Err(response) = require_admin(&identity) {
		return response;
	}

	let target_id = parse_id!(AdminErrorResponse, parse_principal_id(&id));
	let role = match parse_role_name(&payload.role) {
		Ok(role) => role,
		Err(e) => return role_parse_error::<AdminErrorResponse>(e).into_response(),
	};

	if target_id == identity.principal_id && role != Some(Role::Admin) {
		return bad_request::<AdminErrorResponse>(
			"cannot_demote_self",
			"Administrators cannot remove their own admin role",
		)
		.into_response();
	}

	match state.profile_store.update_role(&target_id, role).await {
		Ok(profile) => {
			tracing::info!(target_id = %profile.id, "Profile role updated");
			(StatusCode::OK, Json(AdminProfileResponse::from(&profile))).into_response()
		}
		Err(e) => update_error(e),
	}
}

/// Activate or deactivate a profile.
#[utoipa::path(
    patch,
    path = "/api/admin/profiles/{id}/status",
    params(("id" = String, Path, description = "Profile ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = AdminProfileResponse),
        (status = 400, description = "Invalid ID or self-deactivation", body = AdminErrorResponse),
        (status = 403, description = "Admin role required", body = AdminErrorResponse),
        (status = 404, description = "Profile not found", body = AdminErrorResponse)
    ),
    tag = "admin"
)]
#[tracing::instrument(
	skip(state, identity, payload),
	fields(actor_id = %identity.principal_id, target_id = %id, active = payload.active_status)
)]
pub async fn update_profile_status(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
	if let Err(response) = require_admin(&identity) {
		return response;
	}

	let target_id = parse_id!(AdminErrorResponse, parse_principal_id(&id));

	if target_id == identity.principal_id && !payload.active_status {
		return bad_request::<AdminErrorResponse>(
			"cannot_deactivate_self",
			"Administrators cannot deactivate their own account",
		)
		.into_response();
	}

	match state
		.profile_store
		.update_active_status(&target_id, payload.active_status)
		.await
	{
		Ok(profile) => {
			tracing::info!(target_id = %profile.id, "Profile status updated");
			(StatusCode::OK, Json(AdminProfileResponse::from(&profile))).into_response()
		}
		Err(e) => update_error(e),
	}
}
