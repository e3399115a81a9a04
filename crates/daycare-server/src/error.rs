// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use daycare_server_db::DbError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("Database error: {0}")]
	Db(#[from] DbError),

	#[error("Not found: {0}")]
	NotFound(String),
}

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, body) = match &self {
			ServerError::Db(e) => {
				tracing::error!(error = %e, "database error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "A database error occurred"),
				)
			}
			ServerError::NotFound(what) => (
				StatusCode::NOT_FOUND,
				ErrorResponse::new("not_found", format!("Not found: {what}")),
			),
		};

		(status, Json(body)).into_response()
	}
}
