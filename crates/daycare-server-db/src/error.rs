// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Errors from the profile, session, care and message stores.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	/// A row the caller addressed by id does not exist.
	#[error("Not found: {0}")]
	NotFound(String),

	/// A stored value could not be decoded, or the pool could not be built.
	#[error("Internal: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, DbError>;
