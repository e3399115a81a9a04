// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Messaging HTTP handlers.
//!
//! All authorization lives in [`crate::messaging::MessagingService`]. These
//! handlers only map its outcomes to status codes:
//!
//! | Outcome                                                        | Status |
//! |----------------------------------------------------------------|--------|
//! | `unauthenticated`                                              | 401    |
//! | `validation_error`, `recipient_inactive`                       | 400    |
//! | `recipient_not_found`                                          | 404    |
//! | `sender_verification_failed`, `no_relationship`, `invalid_recipient`, `unauthorized_role` | 403 |
//! | store failure                                                  | 500    |

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use daycare_server_auth::SendDenial;

pub use daycare_server_api::{
	InboxResponse, ListRecipientsResponse, MessageErrorResponse, MessageResponse,
	MessageSuccessResponse, RecipientResponse, SendMessageRequest, SendMessageResponse,
	SentResponse,
};

use crate::{
	api::AppState,
	api_response::{forbidden, internal_error, not_found},
	auth_middleware::{OptionalAuth, RequireAuth},
	messaging::{MessageActionError, SendMessageError},
	parse_id,
	validation::parse_message_id,
};

fn denial_status(denial: &SendDenial) -> StatusCode {
	match denial {
		SendDenial::Unauthenticated => StatusCode::UNAUTHORIZED,
		SendDenial::Validation { .. } | SendDenial::RecipientInactive => StatusCode::BAD_REQUEST,
		SendDenial::RecipientNotFound => StatusCode::NOT_FOUND,
		SendDenial::SenderVerificationFailed
		| SendDenial::NoRelationship
		| SendDenial::InvalidRecipient
		| SendDenial::UnauthorizedRole => StatusCode::FORBIDDEN,
	}
}

/// Send a message.
///
/// Field validation runs before any store access. The sender's role is read
/// from the profile store, never from the request.
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = SendMessageResponse),
        (status = 400, description = "Invalid field or inactive recipient", body = MessageErrorResponse),
        (status = 401, description = "Not authenticated", body = MessageErrorResponse),
        (status = 403, description = "Sender may not message this recipient", body = MessageErrorResponse),
        (status = 404, description = "Recipient not found", body = MessageErrorResponse),
        (status = 500, description = "Internal server error", body = MessageErrorResponse)
    ),
    tag = "messages"
)]
#[tracing::instrument(skip(state, auth, payload))]
pub async fn send_message(
	State(state): State<AppState>,
	OptionalAuth(auth): OptionalAuth,
	Json(payload): Json<SendMessageRequest>,
) -> impl IntoResponse {
	match state.messaging.send(auth.as_ref(), &payload).await {
		Ok(id) => (
			StatusCode::CREATED,
			Json(SendMessageResponse { id: id.to_string() }),
		)
			.into_response(),
		Err(SendMessageError::Denied(denial)) => {
			tracing::debug!(reason = denial.code(), "message send denied");
			(denial_status(&denial), Json(MessageErrorResponse::from(&denial))).into_response()
		}
		Err(SendMessageError::Store(e)) => {
			tracing::error!(error = %e, "Failed to send message");
			internal_error::<MessageErrorResponse>("Failed to send message").into_response()
		}
	}
}

#[utoipa::path(
    get,
    path = "/api/messages/inbox",
    responses(
        (status = 200, description = "Messages received by the caller", body = InboxResponse),
        (status = 401, description = "Not authenticated", body = MessageErrorResponse),
        (status = 500, description = "Internal server error", body = MessageErrorResponse)
    ),
    tag = "messages"
)]
#[tracing::instrument(skip(state, identity), fields(principal_id = %identity.principal_id))]
pub async fn list_inbox(
	State(state): State<AppState>,
	RequireAuth(identity): RequireAuth,
) -> impl IntoResponse {
	let messages = match state.messaging.list_inbox(&identity).await {
		Ok(messages) => messages,
		Err(e) => {
			tracing::error!(error = %e, "Failed to list inbox");
			return internal_error::<MessageErrorResponse>("Failed to load inbox").into_response();
		}
	};
	let unread_count = match state.messaging.unread_count(&identity).await {
		Ok(count) => count,
		Err(e) => {
			tracing::error!(error = %e, "Failed to count unread messages");
			return internal_error::<MessageErrorResponse>("Failed to load inbox").into_response();
		}
	};

	(
		StatusCode::OK,
		Json(InboxResponse {
			messages: messages.iter().map(MessageResponse::from).collect(),
			unread_count,
		}),
	)
		.into_response()
}

#[utoipa::path(
    get,
    path = "/api/messages/sent",
    responses(
        (status = 200, description = "Messages sent by the caller", body = SentResponse),
        (status = 401, description = "Not authenticated", body = MessageErrorResponse),
        (status = 500, description = "Internal server error", body = MessageErrorResponse)
    ),
    tag = "messages"
)]
#[tracing::instrument(skip(state, identity), fields(principal_id = %identity.principal_id))]
pub async fn list_sent(
	State(state): State<AppState>,
	RequireAuth(identity): RequireAuth,
) -> impl IntoResponse {
	match state.messaging.list_sent(&identity).await {
		Ok(messages) => (
			StatusCode::OK,
			Json(SentResponse {
				messages: messages.iter().map(MessageResponse::from).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "Failed to list sent messages");
			internal_error::<MessageErrorResponse>("Failed to load sent messages").into_response()
		}
	}
}

/// Suggested recipients for the compose form.
#[utoipa::path(
    get,
    path = "/api/messages/recipients",
    responses(
        (status = 200, description = "Profiles the caller may message", body = ListRecipientsResponse),
        (status = 401, description = "Not authenticated", body = MessageErrorResponse),
        (status = 500, description = "Internal server error", body = MessageErrorResponse)
    ),
    tag = "messages"
)]
#[tracing::instrument(skip(state, identity), fields(principal_id = %identity.principal_id))]
pub async fn list_recipients(
	State(state): State<AppState>,
	RequireAuth(identity): RequireAuth,
) -> impl IntoResponse {
	match state.messaging.allowed_recipients(&identity).await {
		Ok(profiles) => (
			StatusCode::OK,
			Json(ListRecipientsResponse {
				recipients: profiles.iter().map(RecipientResponse::from).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "Failed to list recipients");
			internal_error::<MessageErrorResponse>("Failed to load recipients").into_response()
		}
	}
}

/// Mark a received message as read. Idempotent.
#[utoipa::path(
    post,
    path = "/api/messages/{id}/read",
    params(("id" = String, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message marked read", body = MessageSuccessResponse),
        (status = 400, description = "Invalid message ID", body = MessageErrorResponse),
        (status = 401, description = "Not authenticated", body = MessageErrorResponse),
        (status = 403, description = "Caller is not the recipient", body = MessageErrorResponse),
        (status = 404, description = "Message not found", body = MessageErrorResponse)
    ),
    tag = "messages"
)]
#[tracing::instrument(skip(state, identity), fields(principal_id = %identity.principal_id))]
pub async fn mark_read(
	State(state): State<AppState>,
	RequireAuth(identity): RequireAuth,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let message_id = parse_id!(MessageErrorResponse, parse_message_id(&id));

	match state.messaging.mark_read(&identity, message_id).await {
		Ok(()) => (
			StatusCode::OK,
			Json(MessageSuccessResponse {
				message: "Message marked as read".to_string(),
			}),
		)
			.into_response(),
		Err(e) => action_error(e, "Only the recipient can mark a message read"),
	}
}

/// Delete a message. Allowed for the sender and for admins.
#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    params(("id" = String, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message deleted", body = MessageSuccessResponse),
        (status = 400, description = "Invalid message ID", body = MessageErrorResponse),
        (status = 401, description = "Not authenticated", body = MessageErrorResponse),
        (status = 403, description = "Caller may not delete this message", body = MessageErrorResponse),
        (status = 404, description = "Message not found", body = MessageErrorResponse)
    ),
    tag = "messages"
)]
#[tracing::instrument(skip(state, identity), fields(principal_id = %identity.principal_id))]
pub async fn delete_message(
	State(state): State<AppState>,
	RequireAuth(identity): RequireAuth,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let message_id = parse_id!(MessageErrorResponse, parse_message_id(&id));

	match state.messaging.delete(&identity, message_id).await {
		Ok(()) => (
			StatusCode::OK,
			Json(MessageSuccessResponse {
				message: "Message deleted".to_string(),
			}),
		)
			.into_response(),
		Err(e) => action_error(e, "Only the sender or an administrator can delete a message"),
	}
}

fn action_error(error: MessageActionError, forbidden_message: &str) -> axum::response::Response {
	match error {
		MessageActionError::NotFound => {
			not_found::<MessageErrorResponse>("Message not found").into_response()
		}
		MessageActionError::Forbidden => {
			forbidden::<MessageErrorResponse>("forbidden", forbidden_message).into_response()
		}
		MessageActionError::Store(e) => {
			tracing::error!(error = %e, "Message action failed");
			internal_error::<MessageErrorResponse>("Failed to update message").into_response()
		}
	}
}
