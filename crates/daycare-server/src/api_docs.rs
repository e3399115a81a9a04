// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for the JSON API.
//!
//! Page routes are not part of the document; they answer with redirects and
//! view models for the frontend rather than a stable API.

use utoipa::OpenApi;

/// The raw JSON document is served at `/api/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Daycare Server API",
        version = "1.0.0",
        description = "Role-based access control and messaging for daycare staff and parents.",
        license(name = "Proprietary"),
        contact(
            name = "Geoffrey Huntley",
            email = "ghuntley@ghuntley.com",
            url = "https://ghuntley.com"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "messages", description = "Sending, listing and managing messages between profiles"),
        (name = "admin", description = "Profile role and status management (admin only)"),
        (name = "health", description = "Health checks")
    ),
    paths(
        // Messaging
        crate::routes::messages::send_message,
        crate::routes::messages::list_inbox,
        crate::routes::messages::list_sent,
        crate::routes::messages::list_recipients,
        crate::routes::messages::mark_read,
        crate::routes::messages::delete_message,
        // Admin
        crate::routes::admin::list_profiles,
        crate::routes::admin::update_profile_role,
        crate::routes::admin::update_profile_status,
        // Health
        crate::routes::health::health_check,
    ),
    components(
        schemas(
            daycare_server_api::SendMessageRequest,
            daycare_server_api::SendMessageResponse,
            daycare_server_api::MessageResponse,
            daycare_server_api::InboxResponse,
            daycare_server_api::SentResponse,
            daycare_server_api::RecipientResponse,
            daycare_server_api::ListRecipientsResponse,
            daycare_server_api::MessageSuccessResponse,
            daycare_server_api::MessageErrorResponse,
            daycare_server_api::AdminProfileResponse,
            daycare_server_api::ProfileCountsResponse,
            daycare_server_api::ListProfilesResponse,
            daycare_server_api::UpdateRoleRequest,
            daycare_server_api::UpdateStatusRequest,
            daycare_server_api::AdminErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::health::HealthStatus,
            crate::error::ErrorResponse,
        )
    )
)]
pub struct ApiDoc;
