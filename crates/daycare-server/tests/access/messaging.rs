// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Messaging API authorization.
//!
//! Key invariant: parents and teachers may only message each other through a
//! care link, and the sender's role always comes from the profile store.

use axum::http::{Method, StatusCode};
use daycare_server_auth::PrincipalId;
use serde_json::json;

use super::support::{body_json, run_access_cases, AccessCase, TestApp, TestUser};

fn message_to(recipient: &TestUser) -> serde_json::Value {
	json!({
		"recipient_id": recipient.id(),
		"subject": "Pickup",
		"content": "Running ten minutes late today."
	})
}

async fn send(app: &TestApp, from: &TestUser, to: &TestUser) -> String {
	let response = app.post("/api/messages", Some(from), message_to(to)).await;
	assert_eq!(response.status(), StatusCode::CREATED);
	body_json(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn send_matrix() {
	let app = TestApp::new().await;
	let f = app.fixtures.clone();

	let case = |name, from: &TestUser, to: &TestUser, expected_status| AccessCase {
		name,
		method: Method::POST,
		path: "/api/messages".to_string(),
		user: Some(from.clone()),
		body: Some(message_to(to)),
		expected_status,
	};

	let cases = vec![
		case("parent_to_linked_teacher", &f.parent, &f.teacher, StatusCode::CREATED),
		case("teacher_to_linked_parent", &f.teacher, &f.parent, StatusCode::CREATED),
		case("parent_to_admin", &f.parent, &f.admin, StatusCode::CREATED),
		case("teacher_to_admin", &f.teacher, &f.admin, StatusCode::CREATED),
		case("admin_to_unlinked_parent", &f.admin, &f.other_parent, StatusCode::CREATED),
		case("admin_to_unassigned", &f.admin, &f.unassigned, StatusCode::CREATED),
		case("unlinked_parent_to_teacher", &f.other_parent, &f.teacher, StatusCode::FORBIDDEN),
		case("teacher_to_unlinked_parent", &f.teacher, &f.other_parent, StatusCode::FORBIDDEN),
		case("parent_to_parent", &f.parent, &f.other_parent, StatusCode::FORBIDDEN),
		case("unassigned_sender", &f.unassigned, &f.admin, StatusCode::FORBIDDEN),
		case("to_inactive_profile", &f.admin, &f.inactive_teacher, StatusCode::BAD_REQUEST),
	];

	run_access_cases(&app, &cases).await;
}

#[tokio::test]
async fn denial_codes_are_reported() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let body = body_json(
		app.post("/api/messages", Some(&f.other_parent), message_to(&f.teacher))
			.await,
	)
	.await;
	assert_eq!(body["error"], "no_relationship");

	let body = body_json(
		app.post("/api/messages", Some(&f.parent), message_to(&f.other_parent))
			.await,
	)
	.await;
	assert_eq!(body["error"], "invalid_recipient");

	let body = body_json(
		app.post("/api/messages", Some(&f.unassigned), message_to(&f.admin))
			.await,
	)
	.await;
	assert_eq!(body["error"], "unauthorized_role");
}

#[tokio::test]
async fn anonymous_send_is_rejected() {
	let app = TestApp::new().await;

	let response = app
		.post("/api/messages", None, message_to(&app.fixtures.teacher))
		.await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(body_json(response).await["error"], "unauthenticated");
}

#[tokio::test]
async fn inactive_sender_cannot_send() {
	let app = TestApp::new().await;

	let response = app
		.post(
			"/api/messages",
			Some(&app.fixtures.inactive_teacher),
			message_to(&app.fixtures.admin),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	assert_eq!(
		body_json(response).await["error"],
		"sender_verification_failed"
	);
}

#[tokio::test]
async fn unknown_recipient_is_404() {
	let app = TestApp::new().await;

	let response = app
		.post(
			"/api/messages",
			Some(&app.fixtures.admin),
			json!({
				"recipient_id": PrincipalId::generate().to_string(),
				"subject": "Hello",
				"content": "Anyone there?"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(body_json(response).await["error"], "recipient_not_found");
}

#[tokio::test]
async fn field_validation_names_the_field() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			"/api/messages",
			Some(&f.parent),
			json!({
				"recipient_id": f.teacher.id(),
				"subject": "x".repeat(201),
				"content": "Hello"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body = body_json(response).await;
	assert_eq!(body["error"], "validation_error");
	assert_eq!(body["field"], "subject");

	let response = app
		.post(
			"/api/messages",
			Some(&f.parent),
			json!({ "recipient_id": f.teacher.id(), "subject": "Hi" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body_json(response).await["field"], "content");

	let response = app
		.post(
			"/api/messages",
			Some(&f.parent),
			json!({ "recipient_id": "not-an-id", "subject": "Hi", "content": "Hello" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body_json(response).await["field"], "recipient_id");
}

#[tokio::test]
async fn stored_text_has_markup_removed() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			"/api/messages",
			Some(&f.parent),
			json!({
				"recipient_id": f.teacher.id(),
				"subject": "<b>Pickup</b>",
				"content": "See you <script>alert(1)</script>at five"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let inbox = body_json(app.get("/api/messages/inbox", Some(&f.teacher)).await).await;
	assert_eq!(inbox["messages"][0]["subject"], "Pickup");
	let content = inbox["messages"][0]["content"].as_str().unwrap();
	assert!(!content.contains('<'));
	assert!(!content.contains("alert"));
}

#[tokio::test]
async fn inbox_and_read_state() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let id = send(&app, &f.parent, &f.teacher).await;

	let inbox = body_json(app.get("/api/messages/inbox", Some(&f.teacher)).await).await;
	assert_eq!(inbox["unread_count"], 1);
	assert_eq!(inbox["messages"][0]["read"], false);

	let sent = body_json(app.get("/api/messages/sent", Some(&f.parent)).await).await;
	assert_eq!(sent["messages"][0]["id"], id.as_str());

	let parent_inbox = body_json(app.get("/api/messages/inbox", Some(&f.parent)).await).await;
	assert_eq!(parent_inbox["messages"], json!([]));

	let path = format!("/api/messages/{id}/read");
	assert_eq!(
		app.post(&path, Some(&f.parent), json!({})).await.status(),
		StatusCode::FORBIDDEN
	);
	assert_eq!(
		app.post(&path, Some(&f.teacher), json!({})).await.status(),
		StatusCode::OK
	);
	assert_eq!(
		app.post(&path, Some(&f.teacher), json!({})).await.status(),
		StatusCode::OK
	);

	let inbox = body_json(app.get("/api/messages/inbox", Some(&f.teacher)).await).await;
	assert_eq!(inbox["unread_count"], 0);
	assert_eq!(inbox["messages"][0]["read"], true);
}

#[tokio::test]
async fn delete_is_limited_to_sender_and_admin() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let first = send(&app, &f.parent, &f.teacher).await;
	let second = send(&app, &f.parent, &f.teacher).await;

	let cases = vec![
		AccessCase {
			name: "recipient_cannot_delete",
			method: Method::DELETE,
			path: format!("/api/messages/{first}"),
			user: Some(f.teacher.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AccessCase {
			name: "sender_can_delete",
			method: Method::DELETE,
			path: format!("/api/messages/{first}"),
			user: Some(f.parent.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AccessCase {
			name: "deleted_message_is_gone",
			method: Method::DELETE,
			path: format!("/api/messages/{first}"),
			user: Some(f.parent.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AccessCase {
			name: "admin_can_delete",
			method: Method::DELETE,
			path: format!("/api/messages/{second}"),
			user: Some(f.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AccessCase {
			name: "malformed_id",
			method: Method::DELETE,
			path: "/api/messages/not-a-uuid".to_string(),
			user: Some(f.admin.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
	];

	run_access_cases(&app, &cases).await;
}

#[tokio::test]
async fn read_endpoints_require_active_session() {
	let app = TestApp::new().await;
	let f = app.fixtures.clone();

	let cases = vec![
		AccessCase {
			name: "anonymous_inbox",
			method: Method::GET,
			path: "/api/messages/inbox".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AccessCase {
			name: "anonymous_recipients",
			method: Method::GET,
			path: "/api/messages/recipients".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AccessCase {
			name: "inactive_inbox",
			method: Method::GET,
			path: "/api/messages/inbox".to_string(),
			user: Some(f.inactive_teacher.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AccessCase {
			name: "parent_sent",
			method: Method::GET,
			path: "/api/messages/sent".to_string(),
			user: Some(f.parent.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
	];

	run_access_cases(&app, &cases).await;
}

#[tokio::test]
async fn recipient_suggestions_follow_care_links() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let body = body_json(app.get("/api/messages/recipients", Some(&f.parent)).await).await;
	let ids: Vec<&str> = body["recipients"]
		.as_array()
		.unwrap()
		.iter()
		.map(|r| r["id"].as_str().unwrap())
		.collect();

	assert!(ids.contains(&f.teacher.id().as_str()));
	assert!(ids.contains(&f.admin.id().as_str()));
	assert!(!ids.contains(&f.other_parent.id().as_str()));
	assert!(!ids.contains(&f.parent.id().as_str()));
	assert!(!ids.contains(&f.inactive_teacher.id().as_str()));

	let body = body_json(
		app.get("/api/messages/recipients", Some(&f.other_parent))
			.await,
	)
	.await;
	let roles: Vec<&str> = body["recipients"]
		.as_array()
		.unwrap()
		.iter()
		.map(|r| r["role"].as_str().unwrap())
		.collect();
	assert_eq!(roles, vec!["admin"]);
}

#[tokio::test]
async fn store_outage_is_not_reported_as_an_authentication_failure() {
	let app = TestApp::new().await;
	let parent = app.fixtures.parent.clone();
	let teacher = app.fixtures.teacher.clone();
	app.state.pool.close().await;

	let response = app
		.post("/api/messages", Some(&parent), message_to(&teacher))
		.await;
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	let body = body_json(response).await;
	assert_eq!(body["error"], "internal_error");

	let response = app.get("/api/messages/inbox", Some(&teacher)).await;
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	let body = body_json(response).await;
	assert_eq!(body["error"], "internal_error");
	assert_eq!(body["message"], "Failed to authenticate request");
}
