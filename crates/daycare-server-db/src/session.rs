// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Principal and session repository.
//!
//! This is the bundled adapter for the identity provider: principals are
//! the provider's users and sessions map an opaque token (stored as its
//! SHA-256 hash) to a principal. The gatekeeper only ever resolves and
//! refreshes sessions; creating them belongs to the provider's login flow.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use daycare_server_auth::{Principal, PrincipalId, Session, SessionId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{parse_timestamp, parse_uuid};

#[async_trait]
pub trait SessionStore: Send + Sync {
	async fn create_principal(&self, principal: &Principal) -> Result<(), DbError>;
	async fn get_principal(&self, id: &PrincipalId) -> Result<Option<Principal>, DbError>;
	async fn create_session(&self, session: &Session, token_hash: &str) -> Result<(), DbError>;
	async fn resolve_session(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<(Session, Principal)>, DbError>;
	async fn refresh_session(&self, id: &SessionId, ttl: Duration) -> Result<(), DbError>;
	async fn delete_session(&self, id: &SessionId) -> Result<bool, DbError>;
	async fn cleanup_expired_sessions(&self) -> Result<u64, DbError>;
}

#[async_trait]
impl SessionStore for SessionRepository {
	async fn create_principal(&self, principal: &Principal) -> Result<(), DbError> {
		self.create_principal(principal).await
	}

	async fn get_principal(&self, id: &PrincipalId) -> Result<Option<Principal>, DbError> {
		self.get_principal(id).await
	}

	async fn create_session(&self, session: &Session, token_hash: &str) -> Result<(), DbError> {
		self.create_session(session, token_hash).await
	}

	async fn resolve_session(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<(Session, Principal)>, DbError> {
		self.resolve_session(token_hash, now).await
	}

	async fn refresh_session(&self, id: &SessionId, ttl: Duration) -> Result<(), DbError> {
		self.refresh_session(id, ttl).await
	}

	async fn delete_session(&self, id: &SessionId) -> Result<bool, DbError> {
		self.delete_session(id).await
	}

	async fn cleanup_expired_sessions(&self) -> Result<u64, DbError> {
		self.cleanup_expired_sessions().await
	}
}

/// Repository for principals and their sessions.
///
/// All tokens are stored as hashes, never in plaintext.
#[derive(Clone)]
pub struct SessionRepository {
	pool: SqlitePool,
}

impl SessionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a principal, or update its email if it already exists.
	#[tracing::instrument(skip(self, principal), fields(principal_id = %principal.id))]
	pub async fn create_principal(&self, principal: &Principal) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO principals (id, email, created_at)
			VALUES (?, ?, ?)
			ON CONFLICT(id) DO UPDATE SET email = excluded.email
			"#,
		)
		.bind(principal.id.to_string())
		.bind(&principal.email)
		.bind(Utc::now().to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(principal_id = %principal.id, "principal stored");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(principal_id = %id))]
	pub async fn get_principal(&self, id: &PrincipalId) -> Result<Option<Principal>, DbError> {
		let row = sqlx::query("SELECT id, email FROM principals WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row
			.map(|row| {
				let id: String = row.get("id");
				Ok(Principal {
					id: PrincipalId::new(parse_uuid(&id, "principal id")?),
					email: row.get("email"),
				})
			})
			.transpose()
	}

	/// Create a new session.
	///
	/// # Arguments
	/// * `session` - The session metadata
	/// * `token_hash` - SHA-256 hash of the session token (never store plaintext)
	#[tracing::instrument(skip(self, session, token_hash), fields(session_id = %session.id, principal_id = %session.principal_id))]
	pub async fn create_session(&self, session: &Session, token_hash: &str) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO sessions (id, principal_id, token_hash, created_at, last_used_at, expires_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(session.id.to_string())
		.bind(session.principal_id.to_string())
		.bind(token_hash)
		.bind(session.created_at.to_rfc3339())
		.bind(session.last_used_at.to_rfc3339())
		.bind(session.expires_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(session_id = %session.id, "session created");
		Ok(())
	}

	/// Resolve a token hash to its session and principal.
	///
	/// # Returns
	/// `None` if no session has this hash or the session expired before `now`.
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn resolve_session(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<(Session, Principal)>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT s.id, s.principal_id, s.created_at, s.last_used_at, s.expires_at, p.email
			FROM sessions s
			JOIN principals p ON p.id = s.principal_id
			WHERE s.token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};

		let session = parse_session_row(&row)?;
		if session.is_expired_at(now) {
			tracing::debug!(session_id = %session.id, "session expired");
			return Ok(None);
		}

		let principal = Principal {
			id: session.principal_id,
			email: row.get("email"),
		};
		Ok(Some((session, principal)))
	}

	/// Touch `last_used_at` and push `expires_at` out by `ttl`.
	#[tracing::instrument(skip(self), fields(session_id = %id))]
	pub async fn refresh_session(&self, id: &SessionId, ttl: Duration) -> Result<(), DbError> {
		let now = Utc::now();
		let result = sqlx::query(
			r#"
			UPDATE sessions
			SET last_used_at = ?, expires_at = ?
			WHERE id = ?
			"#,
		)
		.bind(now.to_rfc3339())
		.bind((now + ttl).to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("session {id}")));
		}
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(session_id = %id))]
	pub async fn delete_session(&self, id: &SessionId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self))]
	pub async fn cleanup_expired_sessions(&self) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
			.bind(Utc::now().to_rfc3339())
			.execute(&self.pool)
			.await?;

		let removed = result.rows_affected();
		if removed > 0 {
			tracing::info!(removed, "expired sessions removed");
		}
		Ok(removed)
	}
}

fn parse_session_row(row: &sqlx::sqlite::SqliteRow) -> Result<Session, DbError> {
	let id: String = row.get("id");
	let principal_id: String = row.get("principal_id");
	let created_at: String = row.get("created_at");
	let last_used_at: String = row.get("last_used_at");
	let expires_at: String = row.get("expires_at");

	Ok(Session {
		id: SessionId::new(parse_uuid(&id, "session id")?),
		principal_id: PrincipalId::new(parse_uuid(&principal_id, "principal_id")?),
		created_at: parse_timestamp(&created_at, "created_at")?,
		last_used_at: parse_timestamp(&last_used_at, "last_used_at")?,
		expires_at: parse_timestamp(&expires_at, "expires_at")?,
	})
}
