// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Page rendering once the gatekeeper has allowed a request.

use axum::http::StatusCode;
use serde_json::json;

use super::support::{body_json, TestApp};

#[tokio::test]
async fn parent_dashboard_shows_only_own_children() {
	let app = TestApp::new().await;

	let response = app.get("/dashboard/parent", Some(&app.fixtures.parent)).await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["dashboard"], "parent");
	assert_eq!(body["children"][0]["name"], "Ada");

	let response = app
		.get("/dashboard/parent", Some(&app.fixtures.other_parent))
		.await;
	let body = body_json(response).await;
	assert_eq!(body["children"], json!([]));
}

#[tokio::test]
async fn teacher_dashboard_lists_assigned_children() {
	let app = TestApp::new().await;

	let response = app
		.get("/dashboard/teacher", Some(&app.fixtures.teacher))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["dashboard"], "teacher");
	assert_eq!(
		body["assigned_children"][0]["id"],
		app.fixtures.child.id.to_string()
	);
}

#[tokio::test]
async fn admin_dashboard_lists_profiles_awaiting_role() {
	let app = TestApp::new().await;

	let response = app.get("/dashboard/admin", Some(&app.fixtures.admin)).await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["dashboard"], "admin");
	assert_eq!(body["counts"]["unassigned"], 1);
	assert_eq!(body["awaiting_role"][0]["email"], "new@example.com");
}

#[tokio::test]
async fn admin_may_open_other_role_areas() {
	let app = TestApp::new().await;

	for path in ["/dashboard/teacher", "/dashboard/parent", "/dashboard/messages"] {
		let response = app.get(path, Some(&app.fixtures.admin)).await;
		assert_eq!(response.status(), StatusCode::OK, "admin denied {path}");
	}
}

#[tokio::test]
async fn messages_page_is_shared_by_all_roles() {
	let app = TestApp::new().await;

	for user in [&app.fixtures.parent, &app.fixtures.teacher] {
		let response = app.get("/dashboard/messages", Some(user)).await;
		assert_eq!(response.status(), StatusCode::OK);
		let body = body_json(response).await;
		assert_eq!(body["unread_count"], 0);
		assert!(body["recipients"].is_array());
	}
}

#[tokio::test]
async fn login_page_keeps_only_local_return_targets() {
	let app = TestApp::new().await;

	let body = body_json(app.get("/login?redirectTo=%2Fdashboard%2Fparent", None).await).await;
	assert_eq!(body["redirect_to"], "/dashboard/parent");

	let body = body_json(
		app.get("/login?redirectTo=https%3A%2F%2Fevil.example", None)
			.await,
	)
	.await;
	assert!(body.get("redirect_to").is_none());
}

#[tokio::test]
async fn access_denied_page_explains_reason() {
	let app = TestApp::new().await;

	let body = body_json(app.get("/access-denied?reason=role-not-assigned", None).await).await;
	assert_eq!(body["reason"], "role-not-assigned");
	assert!(body["message"].as_str().unwrap().contains("administrator"));

	let body = body_json(app.get("/access-denied?reason=bogus", None).await).await;
	assert_eq!(body["reason"], "unauthorized");
}

#[tokio::test]
async fn unknown_page_for_signed_in_user_is_404() {
	let app = TestApp::new().await;

	let response = app.get("/settings", Some(&app.fixtures.parent)).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	let body = body_json(response).await;
	assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn openapi_document_is_served() {
	let app = TestApp::new().await;

	let response = app.get("/api/openapi.json", None).await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert!(body["paths"]["/api/messages"].is_object());
	assert!(body["paths"]["/api/admin/profiles"].is_object());
}

#[tokio::test]
async fn health_reports_database() {
	let app = TestApp::new().await;

	let body = body_json(app.get("/health", None).await).await;
	assert_eq!(body["status"], "healthy");
	assert_eq!(body["database"], "healthy");
}
