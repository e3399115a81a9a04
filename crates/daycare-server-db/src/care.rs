// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Children and teacher assignments (read side).
//!
//! Every query filters on `status = 'active'` for both the child and the
//! assignment; soft-deleted rows never grant visibility or a care link.

use async_trait::async_trait;
use daycare_server_auth::{AssignmentId, Child, ChildId, PrincipalId, RecordStatus, TeacherAssignment};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{parse_optional_date, parse_timestamp, parse_uuid};

#[async_trait]
pub trait CareStore: Send + Sync {
	async fn list_active_children_for_parent(
		&self,
		parent_id: &PrincipalId,
	) -> Result<Vec<Child>, DbError>;
	async fn list_active_children_for_teacher(
		&self,
		teacher_id: &PrincipalId,
	) -> Result<Vec<Child>, DbError>;
	async fn list_active_assignments_for_teacher(
		&self,
		teacher_id: &PrincipalId,
	) -> Result<Vec<TeacherAssignment>, DbError>;
	async fn list_teacher_ids_for_parent(
		&self,
		parent_id: &PrincipalId,
	) -> Result<Vec<PrincipalId>, DbError>;
	async fn list_parent_ids_for_teacher(
		&self,
		teacher_id: &PrincipalId,
	) -> Result<Vec<PrincipalId>, DbError>;
}

#[async_trait]
impl CareStore for CareRepository {
	async fn list_active_children_for_parent(
		&self,
		parent_id: &PrincipalId,
	) -> Result<Vec<Child>, DbError> {
		self.list_active_children_for_parent(parent_id).await
	}

	async fn list_active_children_for_teacher(
		&self,
		teacher_id: &PrincipalId,
	) -> Result<Vec<Child>, DbError> {
		self.list_active_children_for_teacher(teacher_id).await
	}

	async fn list_active_assignments_for_teacher(
		&self,
		teacher_id: &PrincipalId,
	) -> Result<Vec<TeacherAssignment>, DbError> {
		self.list_active_assignments_for_teacher(teacher_id).await
	}

	async fn list_teacher_ids_for_parent(
		&self,
		parent_id: &PrincipalId,
	) -> Result<Vec<PrincipalId>, DbError> {
		self.list_teacher_ids_for_parent(parent_id).await
	}

	async fn list_parent_ids_for_teacher(
		&self,
		teacher_id: &PrincipalId,
	) -> Result<Vec<PrincipalId>, DbError> {
		self.list_parent_ids_for_teacher(teacher_id).await
	}
}

/// Repository for child and assignment lookups.
#[derive(Clone)]
pub struct CareRepository {
	pool: SqlitePool,
}

impl CareRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self), fields(parent_id = %parent_id))]
	pub async fn list_active_children_for_parent(
		&self,
		parent_id: &PrincipalId,
	) -> Result<Vec<Child>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, parent_id, name, date_of_birth, age_group, status, created_at
			FROM children
			WHERE parent_id = ? AND status = 'active'
			ORDER BY name ASC
			"#,
		)
		.bind(parent_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_child_row).collect()
	}

	/// Active children with an active assignment to `teacher_id`.
	#[tracing::instrument(skip(self), fields(teacher_id = %teacher_id))]
	pub async fn list_active_children_for_teacher(
		&self,
		teacher_id: &PrincipalId,
	) -> Result<Vec<Child>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT c.id, c.parent_id, c.name, c.date_of_birth, c.age_group, c.status, c.created_at
			FROM children c
			JOIN teacher_assignments a ON a.child_id = c.id
			WHERE a.teacher_id = ? AND a.status = 'active' AND c.status = 'active'
			ORDER BY c.name ASC
			"#,
		)
		.bind(teacher_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_child_row).collect()
	}

	#[tracing::instrument(skip(self), fields(teacher_id = %teacher_id))]
	pub async fn list_active_assignments_for_teacher(
		&self,
		teacher_id: &PrincipalId,
	) -> Result<Vec<TeacherAssignment>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, teacher_id, child_id, status, created_at
			FROM teacher_assignments
			WHERE teacher_id = ? AND status = 'active'
			"#,
		)
		.bind(teacher_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_assignment_row).collect()
	}

	/// Teachers with an active assignment to one of the parent's active children.
	#[tracing::instrument(skip(self), fields(parent_id = %parent_id))]
	pub async fn list_teacher_ids_for_parent(
		&self,
		parent_id: &PrincipalId,
	) -> Result<Vec<PrincipalId>, DbError> {
		let ids: Vec<String> = sqlx::query_scalar(
			r#"
			SELECT DISTINCT a.teacher_id
			FROM teacher_assignments a
			JOIN children c ON c.id = a.child_id
			WHERE c.parent_id = ? AND c.status = 'active' AND a.status = 'active'
			"#,
		)
		.bind(parent_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		ids
			.iter()
			.map(|id| parse_uuid(id, "teacher_id").map(PrincipalId::new))
			.collect()
	}

	/// Parents of active children with an active assignment to `teacher_id`.
	#[tracing::instrument(skip(self), fields(teacher_id = %teacher_id))]
	pub async fn list_parent_ids_for_teacher(
		&self,
		teacher_id: &PrincipalId,
	) -> Result<Vec<PrincipalId>, DbError> {
		let ids: Vec<String> = sqlx::query_scalar(
			r#"
			SELECT DISTINCT c.parent_id
			FROM children c
			JOIN teacher_assignments a ON a.child_id = c.id
			WHERE a.teacher_id = ? AND c.status = 'active' AND a.status = 'active'
			"#,
		)
		.bind(teacher_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		ids
			.iter()
			.map(|id| parse_uuid(id, "parent_id").map(PrincipalId::new))
			.collect()
	}
}

fn parse_status(value: &str) -> Result<RecordStatus, DbError> {
	value
		.parse()
		.map_err(|e: String| DbError::Internal(format!("Invalid status: {e}")))
}

fn parse_child_row(row: &sqlx::sqlite::SqliteRow) -> Result<Child, DbError> {
	let id: String = row.get("id");
	let parent_id: String = row.get("parent_id");
	let status: String = row.get("status");
	let created_at: String = row.get("created_at");

	Ok(Child {
		id: ChildId::new(parse_uuid(&id, "child id")?),
		parent_id: PrincipalId::new(parse_uuid(&parent_id, "parent_id")?),
		name: row.get("name"),
		date_of_birth: parse_optional_date(row.get("date_of_birth"), "date_of_birth")?,
		age_group: row.get("age_group"),
		status: parse_status(&status)?,
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}

fn parse_assignment_row(row: &sqlx::sqlite::SqliteRow) -> Result<TeacherAssignment, DbError> {
	let id: String = row.get("id");
	let teacher_id: String = row.get("teacher_id");
	let child_id: String = row.get("child_id");
	let status: String = row.get("status");
	let created_at: String = row.get("created_at");

	Ok(TeacherAssignment {
		id: AssignmentId::new(parse_uuid(&id, "assignment id")?),
		teacher_id: PrincipalId::new(parse_uuid(&teacher_id, "teacher_id")?),
		child_id: ChildId::new(parse_uuid(&child_id, "child_id")?),
		status: parse_status(&status)?,
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}
