// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory pools and fixture builders for tests.
//!
//! Children and assignments have no write path in the server; fixtures insert
//! them directly.

use chrono::Utc;
use daycare_server_auth::{
	AssignmentId, Child, ChildId, Principal, PrincipalId, Profile, RecordStatus, Role,
	TeacherAssignment,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::pool::run_migrations;

/// A migrated single-connection in-memory database.
pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str(":memory:")
		.unwrap()
		.foreign_keys(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.idle_timeout(None)
		.max_lifetime(None)
		.connect_with(options)
		.await
		.expect("Failed to create test pool");

	run_migrations(&pool).await.expect("migrations");
	pool
}

pub async fn insert_principal(pool: &SqlitePool, email: &str) -> Principal {
	let principal = Principal {
		id: PrincipalId::generate(),
		email: email.to_string(),
	};
	sqlx::query("INSERT INTO principals (id, email, created_at) VALUES (?, ?, ?)")
		.bind(principal.id.to_string())
		.bind(&principal.email)
		.bind(Utc::now().to_rfc3339())
		.execute(pool)
		.await
		.unwrap();
	principal
}

/// Insert a principal and its profile with the given role and status.
pub async fn insert_profile(
	pool: &SqlitePool,
	email: &str,
	role: Option<Role>,
	active: bool,
) -> Profile {
	let principal = insert_principal(pool, email).await;
	let mut profile = Profile::unassigned_for(&principal, Utc::now());
	profile.role = role;
	profile.active_status = active;
	profile.last_login_at = None;

	sqlx::query(
		r#"
		INSERT INTO profiles (id, role, active_status, display_name, email, created_at, updated_at, last_login_at)
		VALUES (?, ?, ?, ?, ?, ?, ?, NULL)
		"#,
	)
	.bind(profile.id.to_string())
	.bind(Role::to_stored(profile.role))
	.bind(profile.active_status as i32)
	.bind(&profile.display_name)
	.bind(&profile.email)
	.bind(profile.created_at.to_rfc3339())
	.bind(profile.updated_at.to_rfc3339())
	.execute(pool)
	.await
	.unwrap();

	profile
}

pub async fn insert_child(
	pool: &SqlitePool,
	parent_id: PrincipalId,
	name: &str,
	status: RecordStatus,
) -> Child {
	let child = Child {
		id: ChildId::generate(),
		parent_id,
		name: name.to_string(),
		date_of_birth: None,
		age_group: Some("preschool".to_string()),
		status,
		created_at: Utc::now(),
	};
	sqlx::query(
		r#"
		INSERT INTO children (id, parent_id, name, date_of_birth, age_group, status, created_at)
		VALUES (?, ?, ?, NULL, ?, ?, ?)
		"#,
	)
	.bind(child.id.to_string())
	.bind(child.parent_id.to_string())
	.bind(&child.name)
	.bind(&child.age_group)
	.bind(child.status.as_str())
	.bind(child.created_at.to_rfc3339())
	.execute(pool)
	.await
	.unwrap();
	child
}

pub async fn insert_assignment(
	pool: &SqlitePool,
	teacher_id: PrincipalId,
	child_id: ChildId,
	status: RecordStatus,
) -> TeacherAssignment {
	let assignment = TeacherAssignment {
		id: AssignmentId::generate(),
		teacher_id,
		child_id,
		status,
		created_at: Utc::now(),
	};
	sqlx::query(
		r#"
		INSERT INTO teacher_assignments (id, teacher_id, child_id, status, created_at)
		VALUES (?, ?, ?, ?, ?)
		"#,
	)
	.bind(assignment.id.to_string())
	.bind(assignment.teacher_id.to_string())
	.bind(assignment.child_id.to_string())
	.bind(assignment.status.as_str())
	.bind(assignment.created_at.to_rfc3339())
	.execute(pool)
	.await
	.unwrap();
	assignment
}

/// Parent and teacher linked through one active child.
pub struct CareFixture {
	pub parent: Profile,
	pub teacher: Profile,
	pub child: Child,
}

pub async fn insert_care_link(pool: &SqlitePool) -> CareFixture {
	let parent = insert_profile(pool, "parent@example.com", Some(Role::Parent), true).await;
	let teacher = insert_profile(pool, "teacher@example.com", Some(Role::Teacher), true).await;
	let child = insert_child(pool, parent.id, "Ada", RecordStatus::Active).await;
	insert_assignment(pool, teacher.id, child.id, RecordStatus::Active).await;
	CareFixture {
		parent,
		teacher,
		child,
	}
}
