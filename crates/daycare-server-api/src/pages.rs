// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! View models for the gated page routes.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

use crate::messages::{MessageResponse, RecipientResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HomePage {
	pub title: String,
	pub login_path: String,
	pub register_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[serde(rename_all = "camelCase")]
pub struct LoginQuery {
	pub redirect_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginPage {
	/// Local path to return to after signing in.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub redirect_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RegisterPage {
	pub login_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct AccessDeniedQuery {
	pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AccessDeniedPage {
	pub reason: String,
	pub message: String,
}

/// Rendered while the viewer's role is not known yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoadingPage {
	pub loading: bool,
}

impl Default for LoadingPage {
	fn default() -> Self {
		Self { loading: true }
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MessagesPage {
	pub inbox: Vec<MessageResponse>,
	pub unread_count: i64,
	pub recipients: Vec<RecipientResponse>,
}
