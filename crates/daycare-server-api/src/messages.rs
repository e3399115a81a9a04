// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use daycare_server_auth::{Message, MessageField, PublicProfile, SendDenial};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::role_name;

/// Request to send a message.
///
/// Missing fields deserialize as empty strings so that they are reported
/// as field-level validation errors rather than as malformed JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SendMessageRequest {
	#[serde(default)]
	pub recipient_id: String,
	#[serde(default)]
	pub subject: String,
	#[serde(default)]
	pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SendMessageResponse {
	pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MessageResponse {
	pub id: String,
	pub sender_id: String,
	pub recipient_id: String,
	pub subject: String,
	pub content: String,
	pub read: bool,
	pub created_at: DateTime<Utc>,
}

impl From<&Message> for MessageResponse {
	fn from(message: &Message) -> Self {
		Self {
			id: message.id.to_string(),
			sender_id: message.sender_id.to_string(),
			recipient_id: message.recipient_id.to_string(),
			subject: message.subject.clone(),
			content: message.content.clone(),
			read: message.read,
			created_at: message.created_at,
		}
	}
}

/// Messages received by the caller, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct InboxResponse {
	pub messages: Vec<MessageResponse>,
	pub unread_count: i64,
}

/// Messages sent by the caller, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SentResponse {
	pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RecipientResponse {
	pub id: String,
	pub display_name: String,
	pub role: String,
}

impl From<&PublicProfile> for RecipientResponse {
	fn from(profile: &PublicProfile) -> Self {
		Self {
			id: profile.id.to_string(),
			display_name: profile.display_name.clone(),
			role: role_name(profile.role),
		}
	}
}

/// Suggested recipients for the compose form. Sending re-checks every rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListRecipientsResponse {
	pub recipients: Vec<RecipientResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MessageSuccessResponse {
	pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MessageErrorResponse {
	pub error: String,
	pub message: String,
	/// Offending input field for validation errors.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<String>,
}

impl From<&SendDenial> for MessageErrorResponse {
	fn from(denial: &SendDenial) -> Self {
		let (message, field) = match denial {
			SendDenial::Validation { field, message } => (message.clone(), Some(field_name(*field))),
			other => (other.to_string(), None),
		};
		Self {
			error: denial.code().to_string(),
			message,
			field,
		}
	}
}

fn field_name(field: MessageField) -> String {
	field.to_string()
}
