// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Edge gatekeeper behaviour for page routes.
//!
//! Key invariant: a protected page is never served without a session, and
//! role-scoped pages are only served to roles the policy allows.

use axum::http::StatusCode;
use chrono::Duration;
use daycare_server_config::GateFailureMode;

use super::support::{assert_redirect, body_json, login, TestApp};

#[tokio::test]
async fn anonymous_request_is_sent_to_login_with_return_target() {
	let app = TestApp::new().await;

	let response = app.get("/dashboard/parent?tab=messages", None).await;
	assert_redirect(
		&response,
		"/login?redirectTo=%2Fdashboard%2Fparent%3Ftab%3Dmessages",
	);
}

#[tokio::test]
async fn anonymous_unknown_page_is_sent_to_login() {
	let app = TestApp::new().await;

	let response = app.get("/settings", None).await;
	assert_redirect(&response, "/login?redirectTo=%2Fsettings");
}

#[tokio::test]
async fn public_paths_pass_without_session() {
	let app = TestApp::new().await;

	assert_eq!(app.get("/", None).await.status(), StatusCode::OK);
	assert_eq!(app.get("/health", None).await.status(), StatusCode::OK);
	assert_eq!(app.get("/login", None).await.status(), StatusCode::OK);
	assert_eq!(app.get("/register", None).await.status(), StatusCode::OK);
	assert_eq!(
		app.get("/access-denied?reason=not-admin", None).await.status(),
		StatusCode::FORBIDDEN
	);
	// Public but unrouted: reaches the fallback instead of the login page.
	assert_eq!(app.get("/about", None).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_session_is_treated_as_anonymous() {
	let app = TestApp::new().await;
	let mut parent = app.fixtures.parent.clone();
	parent.session_token = login(&app.state, &parent.profile.id, Duration::hours(-1)).await;

	let response = app.get("/dashboard/parent", Some(&parent)).await;
	assert_redirect(&response, "/login?redirectTo=%2Fdashboard%2Fparent");
}

#[tokio::test]
async fn unknown_session_token_is_treated_as_anonymous() {
	let app = TestApp::new().await;

	let response = app
		.get_with_header("/dashboard", "cookie", "daycare_session=ds_not_a_real_token")
		.await;
	assert_redirect(&response, "/login?redirectTo=%2Fdashboard");
}

#[tokio::test]
async fn first_request_creates_exactly_one_unassigned_profile() {
	let app = TestApp::new().await;
	let newcomer = app.new_principal("newcomer@example.com").await;
	let before = app.state.profile_store.count_profiles().await.unwrap();

	let response = app.get("/dashboard", Some(&newcomer)).await;
	assert_redirect(&response, "/access-denied?reason=role-not-assigned");

	let profile = app
		.state
		.profile_store
		.get_profile(&newcomer.profile.id)
		.await
		.unwrap()
		.expect("profile created on first request");
	assert_eq!(profile.role, None);
	assert!(profile.active_status);
	assert_eq!(profile.email, "newcomer@example.com");

	let response = app.get("/dashboard/parent", Some(&newcomer)).await;
	assert_redirect(&response, "/access-denied?reason=role-not-assigned");

	let after = app.state.profile_store.count_profiles().await.unwrap();
	assert_eq!(after.total(), before.total() + 1);
	assert_eq!(after.unassigned, before.unassigned + 1);
}

#[tokio::test]
async fn gated_request_records_last_login() {
	let app = TestApp::new().await;
	let teacher = &app.fixtures.teacher;
	assert!(teacher.profile.last_login_at.is_none());

	app.get("/dashboard/teacher", Some(teacher)).await;

	let profile = app
		.state
		.profile_store
		.get_profile(&teacher.profile.id)
		.await
		.unwrap()
		.unwrap();
	assert!(profile.last_login_at.is_some());
}

#[tokio::test]
async fn dashboard_entry_forwards_to_role_home() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	assert_redirect(&app.get("/dashboard", Some(&f.admin)).await, "/dashboard/admin");
	assert_redirect(&app.get("/dashboard", Some(&f.teacher)).await, "/dashboard/teacher");
	assert_redirect(&app.get("/dashboard", Some(&f.parent)).await, "/dashboard/parent");
	assert_redirect(&app.get("/dashboard/", Some(&f.parent)).await, "/dashboard/parent");
}

#[tokio::test]
async fn role_areas_are_enforced() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	assert_redirect(
		&app.get("/dashboard/admin", Some(&f.teacher)).await,
		"/access-denied?reason=not-admin",
	);
	assert_redirect(
		&app.get("/dashboard/admin/reports", Some(&f.parent)).await,
		"/access-denied?reason=not-admin",
	);
	assert_redirect(
		&app.get("/dashboard/parent", Some(&f.teacher)).await,
		"/access-denied?reason=not-parent",
	);
	assert_redirect(
		&app.get("/dashboard/teacher", Some(&f.parent)).await,
		"/access-denied?reason=unauthorized",
	);
}

#[tokio::test]
async fn dot_segments_cannot_escape_the_role_area() {
	let app = TestApp::new().await;

	let response = app
		.get("/dashboard/teacher/../admin", Some(&app.fixtures.teacher))
		.await;
	assert_redirect(&response, "/access-denied?reason=not-admin");
}

#[tokio::test]
async fn unassigned_profile_is_denied_every_dashboard_page() {
	let app = TestApp::new().await;
	let user = &app.fixtures.unassigned;

	for path in [
		"/dashboard/admin",
		"/dashboard/teacher",
		"/dashboard/parent",
		"/dashboard/messages",
	] {
		assert_redirect(
			&app.get(path, Some(user)).await,
			"/access-denied?reason=role-not-assigned",
		);
	}
}

#[tokio::test]
async fn inactive_profile_is_denied_dashboard() {
	let app = TestApp::new().await;

	let response = app
		.get("/dashboard/teacher", Some(&app.fixtures.inactive_teacher))
		.await;
	assert_redirect(&response, "/access-denied?reason=unauthorized");
}

#[tokio::test]
async fn authenticated_user_is_bounced_from_auth_pages() {
	let app = TestApp::new().await;
	let parent = &app.fixtures.parent;

	assert_redirect(&app.get("/login", Some(parent)).await, "/dashboard");
	assert_redirect(&app.get("/register", Some(parent)).await, "/dashboard");
}

#[tokio::test]
async fn bearer_token_is_accepted_for_pages() {
	let app = TestApp::new().await;
	let token = format!("Bearer {}", app.fixtures.admin.session_token);

	let response = app
		.get_with_header("/dashboard", "authorization", &token)
		.await;
	assert_redirect(&response, "/dashboard/admin");
}

#[tokio::test]
async fn store_failure_fails_closed_by_default() {
	let app = TestApp::new().await;
	let parent = app.fixtures.parent.clone();
	app.state.pool.close().await;

	let response = app.get("/dashboard/parent", Some(&parent)).await;
	assert_redirect(&response, "/access-denied?reason=unauthorized");
}

#[tokio::test]
async fn store_failure_can_fail_open_without_identity() {
	let app = TestApp::with_failure_mode(GateFailureMode::Open).await;
	let parent = app.fixtures.parent.clone();
	app.state.pool.close().await;

	let response = app.get("/dashboard/parent", Some(&parent)).await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["loading"], true);
}
