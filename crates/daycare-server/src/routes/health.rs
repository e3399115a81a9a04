// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health check handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub database: HealthStatus,
	pub version: String,
	pub timestamp: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server and database are reachable", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - liveness plus a database round trip.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
		Ok(_) => HealthStatus::Healthy,
		Err(e) => {
			tracing::error!(error = %e, "health check: database unreachable");
			HealthStatus::Unhealthy
		}
	};

	let response = HealthResponse {
		status: database,
		database,
		version: env!("CARGO_PKG_VERSION").to_string(),
		timestamp: chrono::Utc::now().to_rfc3339(),
	};

	let http_status = match database {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(http_status, Json(response))
}
