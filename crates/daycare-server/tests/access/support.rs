// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	body::Body,
	http::{
		header::{HeaderName, HeaderValue, LOCATION},
		Method, Request, StatusCode,
	},
	response::Response,
	Router,
};
use chrono::Duration;
use daycare_server_auth::{
	generate_session_token, hash_session_token, Child, PrincipalId, Profile, Role, Session,
};
use daycare_server_config::GateFailureMode;
use daycare_server_db::testing::{insert_care_link, insert_principal, insert_profile};
use serde::Serialize;
use tempfile::TempDir;
use tower::ServiceExt;

use daycare_server::{
	api::{create_app_state, create_router, AppState},
	ServerConfig,
};

#[derive(Clone)]
pub struct TestUser {
	pub profile: Profile,
	pub session_token: String,
}

impl TestUser {
	pub fn auth_header(&self) -> (HeaderName, HeaderValue) {
		(
			HeaderName::from_static("cookie"),
			HeaderValue::from_str(&format!("daycare_session={}", self.session_token)).unwrap(),
		)
	}

	pub fn id(&self) -> String {
		self.profile.id.to_string()
	}
}

#[derive(Clone)]
pub struct Fixtures {
	pub admin: TestUser,
	/// Linked to `teacher` through `child`.
	pub parent: TestUser,
	pub teacher: TestUser,
	pub child: Child,
	/// A parent with no children.
	pub other_parent: TestUser,
	pub unassigned: TestUser,
	pub inactive_teacher: TestUser,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub state: AppState,
	_temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		Self::with_failure_mode(GateFailureMode::Closed).await
	}

	pub async fn with_failure_mode(mode: GateFailureMode) -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("test_access.db");
		let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
		let pool = daycare_server_db::create_pool(&db_url).await.unwrap();
		daycare_server_db::run_migrations(&pool).await.unwrap();

		let config = ServerConfig::default();
		let mut state = create_app_state(pool, &config);
		state.auth_config.gate_failure_mode = mode;

		let fixtures = create_fixtures(&state).await;
		let router = create_router(state.clone());

		Self {
			router,
			fixtures,
			state,
			_temp_dir: temp_dir,
		}
	}

	/// A principal with a session but no profile yet.
	pub async fn new_principal(&self, email: &str) -> TestUser {
		let principal = insert_principal(&self.state.pool, email).await;
		let session_token = login(&self.state, &principal.id, Duration::hours(1)).await;
		TestUser {
			profile: Profile::unassigned_for(&principal, chrono::Utc::now()),
			session_token,
		}
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::GET, path, user, Option::<()>::None)
			.await
	}

	pub async fn post(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn patch(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PATCH, path, user, Some(body)).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::DELETE, path, user, Option::<()>::None)
			.await
	}

	pub async fn get_with_header(&self, path: &str, name: &str, value: &str) -> Response<Body> {
		let request = Request::builder()
			.method(Method::GET)
			.uri(path)
			.header(name, value)
			.body(Body::empty())
			.unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header("content-type", "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}
}

pub async fn login(state: &AppState, principal_id: &PrincipalId, ttl: Duration) -> String {
	let token = generate_session_token();
	let session = Session::new(*principal_id, ttl);
	state
		.session_store
		.create_session(&session, &hash_session_token(&token))
		.await
		.unwrap();
	token
}

async fn test_user(state: &AppState, profile: Profile) -> TestUser {
	let session_token = login(state, &profile.id, Duration::hours(1)).await;
	TestUser {
		profile,
		session_token,
	}
}

async fn create_fixtures(state: &AppState) -> Fixtures {
	let pool = &state.pool;

	let care = insert_care_link(pool).await;
	let admin = insert_profile(pool, "admin@example.com", Some(Role::Admin), true).await;
	let other_parent =
		insert_profile(pool, "other-parent@example.com", Some(Role::Parent), true).await;
	let unassigned = insert_profile(pool, "new@example.com", None, true).await;
	let inactive_teacher =
		insert_profile(pool, "former@example.com", Some(Role::Teacher), false).await;

	Fixtures {
		admin: test_user(state, admin).await,
		parent: test_user(state, care.parent).await,
		teacher: test_user(state, care.teacher).await,
		child: care.child,
		other_parent: test_user(state, other_parent).await,
		unassigned: test_user(state, unassigned).await,
		inactive_teacher: test_user(state, inactive_teacher).await,
	}
}

pub fn location(response: &Response<Body>) -> String {
	response
		.headers()
		.get(LOCATION)
		.map(|value| value.to_str().unwrap().to_string())
		.unwrap_or_default()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

/// Assert a `303 See Other` to `target`.
pub fn assert_redirect(response: &Response<Body>, target: &str) {
	assert_eq!(
		response.status(),
		StatusCode::SEE_OTHER,
		"expected redirect to {target}"
	);
	assert_eq!(location(response), target);
}

pub struct AccessCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<serde_json::Value>,
	pub expected_status: StatusCode,
}

pub async fn run_access_cases(app: &TestApp, cases: &[AccessCase]) {
	for case in cases {
		let response = match (&case.method, &case.body) {
			(m, Some(body)) if *m == Method::POST => {
				app.post(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PATCH => {
				app
					.patch(&case.path, case.user.as_ref(), body.clone())
					.await
			}
			(m, _) if *m == Method::DELETE => app.delete(&case.path, case.user.as_ref()).await,
			_ => app.get(&case.path, case.user.as_ref()).await,
		};

		if response.status() != case.expected_status {
			let (parts, body) = response.into_parts();
			let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
			let body_str = String::from_utf8_lossy(&body_bytes);
			panic!(
				"Case '{}': {} {} - expected {}, got {}\nResponse body: {}",
				case.name, case.method, case.path, case.expected_status, parts.status, body_str
			);
		}
	}
}
