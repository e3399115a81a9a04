// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Path and body parameter parsing shared by API handlers.

use daycare_server_auth::{MessageId, PrincipalId, Role, UNASSIGNED_ROLE};
use uuid::Uuid;

/// Error type for ID parsing failures.
#[derive(Debug, Clone)]
pub struct IdParseError {
	pub error: String,
	pub message: String,
}

impl IdParseError {
	fn invalid(message: impl Into<String>) -> Self {
		Self {
			error: "invalid_id".to_string(),
			message: message.into(),
		}
	}
}

pub fn parse_principal_id(id_str: &str) -> Result<PrincipalId, IdParseError> {
	Uuid::parse_str(id_str)
		.map(PrincipalId::new)
		.map_err(|_| IdParseError::invalid("Invalid profile id"))
}

pub fn parse_message_id(id_str: &str) -> Result<MessageId, IdParseError> {
	Uuid::parse_str(id_str)
		.map(MessageId::new)
		.map_err(|_| IdParseError::invalid("Invalid message id"))
}

/// Error type for role parsing failures.
#[derive(Debug, Clone)]
pub struct RoleParseError {
	pub error: String,
	pub message: String,
}

/// Parse a role name from a request body. `"unassigned"` maps to `None`.
pub fn parse_role_name(value: &str) -> Result<Option<Role>, RoleParseError> {
	let value = value.trim().to_ascii_lowercase();
	if value == UNASSIGNED_ROLE {
		return Ok(None);
	}
	value.parse::<Role>().map(Some).map_err(|_| RoleParseError {
		error: "invalid_role".to_string(),
		message: format!(
			"Role must be one of admin, teacher, parent or {UNASSIGNED_ROLE}"
		),
	})
}
