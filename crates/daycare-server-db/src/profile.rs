// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile repository.
//!
//! Profiles are keyed by the principal id. Creation is conflict-tolerant so
//! concurrent first requests from one principal never produce two rows.
//! The `role` column stores `unassigned` for profiles without a role; any
//! value that is not an assignable role loads as unassigned.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use daycare_server_auth::{PrincipalId, Profile, Role};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{parse_optional_timestamp, parse_timestamp, parse_uuid};

/// Profile totals for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCounts {
	pub admin: i64,
	pub teacher: i64,
	pub parent: i64,
	pub unassigned: i64,
	pub inactive: i64,
}

impl ProfileCounts {
	pub fn total(&self) -> i64 {
		self.admin + self.teacher + self.parent + self.unassigned
	}
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
	async fn get_profile(&self, id: &PrincipalId) -> Result<Option<Profile>, DbError>;
	async fn create_profile_if_absent(&self, profile: &Profile) -> Result<bool, DbError>;
	async fn touch_last_login(&self, id: &PrincipalId, at: DateTime<Utc>) -> Result<(), DbError>;
	async fn update_role(&self, id: &PrincipalId, role: Option<Role>) -> Result<Profile, DbError>;
	async fn update_active_status(&self, id: &PrincipalId, active: bool)
		-> Result<Profile, DbError>;
	async fn list_profiles(&self) -> Result<Vec<Profile>, DbError>;
	async fn list_unassigned_profiles(&self) -> Result<Vec<Profile>, DbError>;
	async fn count_profiles(&self) -> Result<ProfileCounts, DbError>;
}

#[async_trait]
impl ProfileStore for ProfileRepository {
	async fn get_profile(&self, id: &PrincipalId) -> Result<Option<Profile>, DbError> {
		self.get_profile(id).await
	}

	async fn create_profile_if_absent(&self, profile: &Profile) -> Result<bool, DbError> {
		self.create_profile_if_absent(profile).await
	}

	async fn touch_last_login(&self, id: &PrincipalId, at: DateTime<Utc>) -> Result<(), DbError> {
		self.touch_last_login(id, at).await
	}

	async fn update_role(&self, id: &PrincipalId, role: Option<Role>) -> Result<Profile, DbError> {
		self.update_role(id, role).await
	}

	async fn update_active_status(
		&self,
		id: &PrincipalId,
		active: bool,
	) -> Result<Profile, DbError> {
		self.update_active_status(id, active).await
	}

	async fn list_profiles(&self) -> Result<Vec<Profile>, DbError> {
		self.list_profiles().await
	}

	async fn list_unassigned_profiles(&self) -> Result<Vec<Profile>, DbError> {
		self.list_unassigned_profiles().await
	}

	async fn count_profiles(&self) -> Result<ProfileCounts, DbError> {
		self.count_profiles().await
	}
}

const PROFILE_COLUMNS: &str =
	"id, role, active_status, display_name, email, created_at, updated_at, last_login_at";

/// Repository for profile database operations.
#[derive(Clone)]
pub struct ProfileRepository {
	pool: SqlitePool,
}

impl ProfileRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Get a profile by principal id.
	///
	/// # Returns
	/// `None` if the principal has no profile yet.
	#[tracing::instrument(skip(self), fields(principal_id = %id))]
	pub async fn get_profile(&self, id: &PrincipalId) -> Result<Option<Profile>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?"
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| parse_profile_row(&r)).transpose()
	}

	/// Insert `profile` unless one already exists for its id.
	///
	/// # Returns
	/// `true` if this call inserted the row, `false` if it already existed.
	#[tracing::instrument(skip(self, profile), fields(principal_id = %profile.id))]
	pub async fn create_profile_if_absent(&self, profile: &Profile) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			INSERT INTO profiles (id, role, active_status, display_name, email, created_at, updated_at, last_login_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			ON CONFLICT(id) DO NOTHING
			"#,
		)
		.bind(profile.id.to_string())
		.bind(Role::to_stored(profile.role))
		.bind(profile.active_status as i32)
		.bind(&profile.display_name)
		.bind(&profile.email)
		.bind(profile.created_at.to_rfc3339())
		.bind(profile.updated_at.to_rfc3339())
		.bind(profile.last_login_at.map(|t| t.to_rfc3339()))
		.execute(&self.pool)
		.await?;

		let created = result.rows_affected() > 0;
		if created {
			tracing::info!(principal_id = %profile.id, "profile created as unassigned");
		}
		Ok(created)
	}

	#[tracing::instrument(skip(self), fields(principal_id = %id))]
	pub async fn touch_last_login(&self, id: &PrincipalId, at: DateTime<Utc>) -> Result<(), DbError> {
		sqlx::query("UPDATE profiles SET last_login_at = ? WHERE id = ?")
			.bind(at.to_rfc3339())
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	/// Set or clear a profile's role.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if the profile does not exist.
	#[tracing::instrument(skip(self, role), fields(principal_id = %id, role = Role::to_stored(role)))]
	pub async fn update_role(&self, id: &PrincipalId, role: Option<Role>) -> Result<Profile, DbError> {
		let result = sqlx::query("UPDATE profiles SET role = ?, updated_at = ? WHERE id = ?")
			.bind(Role::to_stored(role))
			.bind(Utc::now().to_rfc3339())
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("profile {id}")));
		}
		tracing::info!(principal_id = %id, role = Role::to_stored(role), "profile role updated");
		self.require_profile(id).await
	}

	/// Activate or deactivate a profile.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if the profile does not exist.
	#[tracing::instrument(skip(self), fields(principal_id = %id))]
	pub async fn update_active_status(
		&self,
		id: &PrincipalId,
		active: bool,
	) -> Result<Profile, DbError> {
		let result =
			sqlx::query("UPDATE profiles SET active_status = ?, updated_at = ? WHERE id = ?")
				.bind(active as i32)
				.bind(Utc::now().to_rfc3339())
				.bind(id.to_string())
				.execute(&self.pool)
				.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("profile {id}")));
		}
		tracing::info!(principal_id = %id, active, "profile status updated");
		self.require_profile(id).await
	}

	/// All profiles, oldest first.
	#[tracing::instrument(skip(self))]
	pub async fn list_profiles(&self) -> Result<Vec<Profile>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at ASC, rowid ASC"
		))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_profile_row).collect()
	}

	/// Profiles waiting for an admin to assign a role, oldest first.
	#[tracing::instrument(skip(self))]
	pub async fn list_unassigned_profiles(&self) -> Result<Vec<Profile>, DbError> {
		let profiles = self.list_profiles().await?;
		Ok(profiles.into_iter().filter(|p| p.role.is_none()).collect())
	}

	#[tracing::instrument(skip(self))]
	pub async fn count_profiles(&self) -> Result<ProfileCounts, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT role, active_status, COUNT(*) AS n
			FROM profiles
			GROUP BY role, active_status
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		let mut counts = ProfileCounts::default();
		for row in rows {
			let role: String = row.get("role");
			let active: i32 = row.get("active_status");
			let n: i64 = row.get("n");

			match Role::parse_stored(&role) {
				Some(Role::Admin) => counts.admin += n,
				Some(Role::Teacher) => counts.teacher += n,
				Some(Role::Parent) => counts.parent += n,
				None => counts.unassigned += n,
			}
			if active == 0 {
				counts.inactive += n;
			}
		}
		Ok(counts)
	}

	async fn require_profile(&self, id: &PrincipalId) -> Result<Profile, DbError> {
		self
			.get_profile(id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("profile {id}")))
	}
}

fn parse_profile_row(row: &sqlx::sqlite::SqliteRow) -> Result<Profile, DbError> {
	let id: String = row.get("id");
	let role: String = row.get("role");
	let active_status: i32 = row.get("active_status");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");
	let last_login_at: Option<String> = row.get("last_login_at");

	let parsed_role = Role::parse_stored(&role);
	if parsed_role.is_none() && role != daycare_server_auth::types::UNASSIGNED_ROLE {
		tracing::warn!(principal_id = %id, "unknown stored role, treating profile as unassigned");
	}

	Ok(Profile {
		id: PrincipalId::new(parse_uuid(&id, "profile id")?),
		role: parsed_role,
		active_status: active_status != 0,
		display_name: row.get("display_name"),
		email: row.get("email"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
		last_login_at: parse_optional_timestamp(last_login_at, "last_login_at")?,
	})
}
