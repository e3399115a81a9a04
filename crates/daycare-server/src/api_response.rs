// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error bodies for the JSON API.
//!
//! Three body types share the `{ "error", "message" }` shape:
//! [`ErrorResponse`](crate::error::ErrorResponse) for generic failures,
//! `AdminErrorResponse` for profile management and `MessageErrorResponse`
//! for messaging. The messaging body also carries an optional `field`, set
//! only by send validation denials; the helpers here always leave it empty.

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::validation::{IdParseError, RoleParseError};

/// Builds an error body from a stable `error` code and a display message.
pub trait ApiErrorResponse: Serialize + Send {
	fn new(error: impl Into<String>, message: impl Into<String>) -> Self;
}

/// Implements [`ApiErrorResponse`] for a body with exactly `error` and `message`.
#[macro_export]
macro_rules! impl_api_error_response {
	($ty:ty) => {
		impl $crate::api_response::ApiErrorResponse for $ty {
			fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
				Self {
					error: error.into(),
					message: message.into(),
				}
			}
		}
	};
}

impl_api_error_response!(daycare_server_api::AdminErrorResponse);
impl_api_error_response!(crate::error::ErrorResponse);

// `field` is filled in from `SendDenial` instead.
impl ApiErrorResponse for daycare_server_api::MessageErrorResponse {
	fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
			field: None,
		}
	}
}

/// Unwraps a parsed path id or returns `400` from the enclosing handler.
#[macro_export]
macro_rules! parse_id {
	($error_ty:ty, $parse_expr:expr) => {
		match $parse_expr {
			Ok(id) => id,
			Err(e) => {
				return $crate::api_response::id_parse_error::<$error_ty>(e).into_response();
			}
		}
	};
}

/// `400` for a malformed message or profile id.
pub fn id_parse_error<T: ApiErrorResponse>(e: IdParseError) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(e.error, e.message)))
}

/// `400` for a role name an admin cannot assign.
pub fn role_parse_error<T: ApiErrorResponse>(e: RoleParseError) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(e.error, e.message)))
}

/// Create a 400 Bad Request response.
pub fn bad_request<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(error, message)))
}

/// Create a 404 Not Found response.
pub fn not_found<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::NOT_FOUND, Json(T::new("not_found", message)))
}

/// Create a 500 Internal Server Error response.
pub fn internal_error<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(T::new("internal_error", message)),
	)
}

/// Create a 403 Forbidden response.
pub fn forbidden<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::FORBIDDEN, Json(T::new(error, message)))
}

/// Create a 401 Unauthorized response.
pub fn unauthorized<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::UNAUTHORIZED, Json(T::new(error, message)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use daycare_server_api::MessageErrorResponse;

	#[test]
	fn message_error_helpers_leave_field_empty() {
		let (status, Json(body)) = forbidden::<MessageErrorResponse>("forbidden", "Not yours");
		assert_eq!(status, StatusCode::FORBIDDEN);
		assert_eq!(body.error, "forbidden");
		assert!(body.field.is_none());
	}

	#[test]
	fn malformed_message_id_is_bad_request() {
		let err = crate::validation::parse_message_id("not-a-uuid").unwrap_err();
		let (status, Json(body)) = id_parse_error::<crate::error::ErrorResponse>(err);
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body.error, "invalid_id");
	}
}
