// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Messaging authorization rules.
//!
//! The send flow in the server runs a fixed sequence of checks; the pieces
//! that need no I/O live here:
//!
//! - [`validate_message_fields`] - presence, length bounds and sanitizing
//! - [`relationship_requirement`] - what the sender/recipient role pair needs
//! - [`SendDenial`] - the reason a send was refused
//!
//! # Relationship matrix
//!
//! | sender ↓ / recipient → | admin | teacher   | parent    | unassigned |
//! |------------------------|-------|-----------|-----------|------------|
//! | admin                  | allow | allow     | allow     | allow      |
//! | teacher                | allow | allow     | care link | invalid    |
//! | parent                 | allow | care link | invalid   | invalid    |
//! | unassigned             | role  | role      | role      | role       |
//!
//! A care link exists when the parent has an active child with an active
//! assignment to the teacher.

use serde::{Deserialize, Serialize};

use crate::sanitize::sanitize_text;
use crate::types::{PrincipalId, Role};

pub const MAX_SUBJECT_CHARS: usize = 200;
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Why a send was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum SendDenial {
	#[error("authentication required")]
	Unauthenticated,

	#[error("{field}: {message}")]
	Validation { field: MessageField, message: String },

	#[error("recipient not found")]
	RecipientNotFound,

	#[error("recipient is inactive")]
	RecipientInactive,

	#[error("sender could not be verified")]
	SenderVerificationFailed,

	#[error("no care relationship with recipient")]
	NoRelationship,

	#[error("recipient is not a valid target for this sender")]
	InvalidRecipient,

	#[error("sender role may not send messages")]
	UnauthorizedRole,
}

impl SendDenial {
	pub fn validation(field: MessageField, message: impl Into<String>) -> Self {
		SendDenial::Validation {
			field,
			message: message.into(),
		}
	}

	/// Stable machine-readable code for API responses.
	pub fn code(&self) -> &'static str {
		match self {
			SendDenial::Unauthenticated => "unauthenticated",
			SendDenial::Validation { .. } => "validation_error",
			SendDenial::RecipientNotFound => "recipient_not_found",
			SendDenial::RecipientInactive => "recipient_inactive",
			SendDenial::SenderVerificationFailed => "sender_verification_failed",
			SendDenial::NoRelationship => "no_relationship",
			SendDenial::InvalidRecipient => "invalid_recipient",
			SendDenial::UnauthorizedRole => "unauthorized_role",
		}
	}
}

/// Input fields of a send request, used to attribute validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageField {
	RecipientId,
	Subject,
	Content,
}

impl std::fmt::Display for MessageField {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			MessageField::RecipientId => write!(f, "recipient_id"),
			MessageField::Subject => write!(f, "subject"),
			MessageField::Content => write!(f, "content"),
		}
	}
}

/// Subject and body after validation and sanitizing, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMessage {
	pub recipient_id: PrincipalId,
	pub subject: String,
	pub content: String,
}

/// Presence, bounds and sanitizing for a send request.
///
/// Checks run in order: presence of each field (recipient, subject, content),
/// then recipient id format, then length bounds on the trimmed input, then
/// sanitizing. A field that is empty once sanitized is rejected.
pub fn validate_message_fields(
	recipient_id: &str,
	subject: &str,
	content: &str,
) -> Result<ValidatedMessage, SendDenial> {
	let recipient_id = recipient_id.trim();
	let subject = subject.trim();
	let content = content.trim();

	if recipient_id.is_empty() {
		return Err(SendDenial::validation(
			MessageField::RecipientId,
			"recipient is required",
		));
	}
	if subject.is_empty() {
		return Err(SendDenial::validation(
			MessageField::Subject,
			"subject is required",
		));
	}
	if content.is_empty() {
		return Err(SendDenial::validation(
			MessageField::Content,
			"message content is required",
		));
	}

	let recipient_id: PrincipalId = recipient_id.parse().map_err(|_| {
		SendDenial::validation(MessageField::RecipientId, "recipient id is not valid")
	})?;

	if subject.chars().count() > MAX_SUBJECT_CHARS {
		return Err(SendDenial::validation(
			MessageField::Subject,
			format!("subject must be at most {MAX_SUBJECT_CHARS} characters"),
		));
	}
	if content.chars().count() > MAX_CONTENT_CHARS {
		return Err(SendDenial::validation(
			MessageField::Content,
			format!("message content must be at most {MAX_CONTENT_CHARS} characters"),
		));
	}

	let subject = sanitize_text(subject);
	let content = sanitize_text(content);

	if subject.is_empty() {
		return Err(SendDenial::validation(
			MessageField::Subject,
			"subject is empty after removing markup",
		));
	}
	if content.is_empty() {
		return Err(SendDenial::validation(
			MessageField::Content,
			"message content is empty after removing markup",
		));
	}

	Ok(ValidatedMessage {
		recipient_id,
		subject,
		content,
	})
}

/// What a sender/recipient role pair needs before a message may be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipRequirement {
	/// No further checks.
	Always,
	/// The parent and teacher must share a care link.
	CareLink {
		parent_id: PrincipalId,
		teacher_id: PrincipalId,
	},
	/// Refuse with the given denial.
	Deny(SendDenialKind),
}

/// Denials that [`relationship_requirement`] can produce without I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendDenialKind {
	InvalidRecipient,
	UnauthorizedRole,
}

impl From<SendDenialKind> for SendDenial {
	fn from(kind: SendDenialKind) -> Self {
		match kind {
			SendDenialKind::InvalidRecipient => SendDenial::InvalidRecipient,
			SendDenialKind::UnauthorizedRole => SendDenial::UnauthorizedRole,
		}
	}
}

/// Decide what a send from `sender` to `recipient` requires.
///
/// `sender_role`/`recipient_role` are `None` for unassigned profiles.
pub fn relationship_requirement(
	sender_id: PrincipalId,
	sender_role: Option<Role>,
	recipient_id: PrincipalId,
	recipient_role: Option<Role>,
) -> RelationshipRequirement {
	use RelationshipRequirement::*;

	match (sender_role, recipient_role) {
		(Some(Role::Admin), _) => Always,

		(Some(Role::Parent), Some(Role::Admin)) => Always,
		(Some(Role::Parent), Some(Role::Teacher)) => CareLink {
			parent_id: sender_id,
			teacher_id: recipient_id,
		},
		(Some(Role::Parent), _) => Deny(SendDenialKind::InvalidRecipient),

		(Some(Role::Teacher), Some(Role::Admin | Role::Teacher)) => Always,
		(Some(Role::Teacher), Some(Role::Parent)) => CareLink {
			parent_id: recipient_id,
			teacher_id: sender_id,
		},
		(Some(Role::Teacher), None) => Deny(SendDenialKind::InvalidRecipient),

		(None, _) => Deny(SendDenialKind::UnauthorizedRole),
	}
}
