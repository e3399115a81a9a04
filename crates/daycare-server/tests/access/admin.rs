// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for admin routes.
//!
//! Key invariant: only profiles holding the admin role reach these handlers.

use axum::http::{Method, StatusCode};
use daycare_server_auth::{PrincipalId, Role};
use serde_json::json;

use super::support::{assert_redirect, body_json, run_access_cases, AccessCase, TestApp};

#[tokio::test]
async fn non_admins_are_forbidden() {
	let app = TestApp::new().await;
	let f = app.fixtures.clone();
	let target = f.other_parent.id();

	let mut cases = Vec::new();
	for (name, user) in [
		("teacher", &f.teacher),
		("parent", &f.parent),
		("unassigned", &f.unassigned),
	] {
		cases.push(AccessCase {
			name,
			method: Method::GET,
			path: "/api/admin/profiles".to_string(),
			user: Some(user.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		});
		cases.push(AccessCase {
			name,
			method: Method::PATCH,
			path: format!("/api/admin/profiles/{target}/role"),
			user: Some(user.clone()),
			body: Some(json!({ "role": "admin" })),
			expected_status: StatusCode::FORBIDDEN,
		});
		cases.push(AccessCase {
			name,
			method: Method::PATCH,
			path: format!("/api/admin/profiles/{target}/status"),
			user: Some(user.clone()),
			body: Some(json!({ "active_status": false })),
			expected_status: StatusCode::FORBIDDEN,
		});
	}
	cases.push(AccessCase {
		name: "anonymous",
		method: Method::GET,
		path: "/api/admin/profiles".to_string(),
		user: None,
		body: None,
		expected_status: StatusCode::UNAUTHORIZED,
	});

	run_access_cases(&app, &cases).await;

	let profile = app
		.state
		.profile_store
		.get_profile(&f.other_parent.profile.id)
		.await
		.unwrap()
		.unwrap();
	assert_eq!(profile.role, Some(Role::Parent));
	assert!(profile.active_status);
}

#[tokio::test]
async fn admin_lists_profiles_with_counts() {
	let app = TestApp::new().await;

	let response = app.get("/api/admin/profiles", Some(&app.fixtures.admin)).await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;

	assert_eq!(body["profiles"].as_array().unwrap().len(), 6);
	assert_eq!(body["counts"]["admin"], 1);
	assert_eq!(body["counts"]["unassigned"], 1);
	assert_eq!(body["counts"]["inactive"], 1);
}

#[tokio::test]
async fn assigning_a_role_opens_the_dashboard() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/admin/profiles/{}/role", f.unassigned.id());

	assert_redirect(
		&app.get("/dashboard", Some(&f.unassigned)).await,
		"/access-denied?reason=role-not-assigned",
	);

	let response = app
		.patch(&path, Some(&f.admin), json!({ "role": "Teacher" }))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_json(response).await["role"], "teacher");

	// Roles are read per request, so the change applies immediately.
	assert_redirect(
		&app.get("/dashboard", Some(&f.unassigned)).await,
		"/dashboard/teacher",
	);

	let response = app
		.patch(&path, Some(&f.admin), json!({ "role": "unassigned" }))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_redirect(
		&app.get("/dashboard/teacher", Some(&f.unassigned)).await,
		"/access-denied?reason=role-not-assigned",
	);
}

#[tokio::test]
async fn deactivating_a_profile_closes_the_dashboard() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.patch(
			&format!("/api/admin/profiles/{}/status", f.parent.id()),
			Some(&f.admin),
			json!({ "active_status": false }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_json(response).await["active_status"], false);

	assert_redirect(
		&app.get("/dashboard/parent", Some(&f.parent)).await,
		"/access-denied?reason=unauthorized",
	);
	assert_eq!(
		app.get("/api/messages/inbox", Some(&f.parent)).await.status(),
		StatusCode::FORBIDDEN
	);
}

#[tokio::test]
async fn admin_cannot_lock_themselves_out() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let response = app
		.patch(
			&format!("/api/admin/profiles/{}/role", admin.id()),
			Some(admin),
			json!({ "role": "parent" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body_json(response).await["error"], "cannot_demote_self");

	let response = app
		.patch(
			&format!("/api/admin/profiles/{}/status", admin.id()),
			Some(admin),
			json!({ "active_status": false }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body_json(response).await["error"], "cannot_deactivate_self");

	// Re-asserting the admin role on oneself is harmless.
	let response = app
		.patch(
			&format!("/api/admin/profiles/{}/role", admin.id()),
			Some(admin),
			json!({ "role": "admin" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn bad_targets_and_roles_are_rejected() {
	let app = TestApp::new().await;
	let f = app.fixtures.clone();

	let cases = vec![
		AccessCase {
			name: "unknown_profile",
			method: Method::PATCH,
			path: format!("/api/admin/profiles/{}/role", PrincipalId::generate()),
			user: Some(f.admin.clone()),
			body: Some(json!({ "role": "teacher" })),
			expected_status: StatusCode::NOT_FOUND,
		},
		AccessCase {
			name: "unknown_profile_status",
			method: Method::PATCH,
			path: format!("/api/admin/profiles/{}/status", PrincipalId::generate()),
			user: Some(f.admin.clone()),
			body: Some(json!({ "active_status": true })),
			expected_status: StatusCode::NOT_FOUND,
		},
		AccessCase {
			name: "malformed_id",
			method: Method::PATCH,
			path: "/api/admin/profiles/nope/role".to_string(),
			user: Some(f.admin.clone()),
			body: Some(json!({ "role": "teacher" })),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AccessCase {
			name: "unknown_role",
			method: Method::PATCH,
			path: format!("/api/admin/profiles/{}/role", f.parent.id()),
			user: Some(f.admin.clone()),
			body: Some(json!({ "role": "director" })),
			expected_status: StatusCode::BAD_REQUEST,
		},
	];

	run_access_cases(&app, &cases).await;
}
