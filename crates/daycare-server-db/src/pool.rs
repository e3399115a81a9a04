// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};
use std::str::FromStr;

use crate::error::DbError;

const MIGRATIONS: &[(&str, &str)] = &[
	(
		"001_principals_and_sessions",
		include_str!("../migrations/001_principals_and_sessions.sql"),
	),
	("002_profiles", include_str!("../migrations/002_profiles.sql")),
	(
		"003_children_and_assignments",
		include_str!("../migrations/003_children_and_assignments.sql"),
	),
	("004_messages", include_str!("../migrations/004_messages.sql")),
];

/// Create a SqlitePool with WAL mode and common settings.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./daycare.db")
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid or connection fails.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.foreign_keys(true)
		.create_if_missing(true);

	let pool = SqlitePool::connect_with(options).await?;

	tracing::debug!("database pool created");
	Ok(pool)
}

/// Run all schema migrations.
///
/// Every statement is `CREATE ... IF NOT EXISTS`, so running this against an
/// already migrated database is a no-op.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for (name, sql) in MIGRATIONS {
		for stmt in statements(sql) {
			sqlx::query(stmt).execute(pool).await?;
		}
		tracing::debug!(migration = name, "migration applied");
	}
	Ok(())
}

fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|stmt| {
		stmt
			.lines()
			.any(|line| !line.trim().is_empty() && !line.trim_start().starts_with("--"))
	})
}
