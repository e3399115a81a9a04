// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # daycare-server-db
//!
//! Persistence layer for the daycare server using SQLite via sqlx.
//!
//! ## Repository Pattern
//!
//! Each domain has two components:
//! - **`*Store` trait**: the interface handlers and services depend on
//! - **`*Repository` struct**: the SQLite implementation holding a `SqlitePool`
//!
//! The trait impl delegates to `#[tracing::instrument]`ed inherent methods.
//!
//! ## Conventions
//!
//! | Operation | Return type |
//! |-----------|-------------|
//! | Get by ID | `Result<Option<T>>` |
//! | List | `Result<Vec<T>>` |
//! | Update by ID | `Result<T>`, `DbError::NotFound` if the row is missing |
//! | Delete / flag | `Result<bool>` (true if a row changed) |
//! | Count | `Result<i64>` |
//!
//! Ids are stored as UUID strings and timestamps as RFC 3339 strings.

pub mod care;
mod error;
pub mod message;
pub mod pool;
pub mod profile;
mod row;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use care::{CareRepository, CareStore};
pub use error::{DbError, Result};
pub use message::{MessageRepository, MessageStore};
pub use pool::{create_pool, run_migrations};
pub use profile::{ProfileCounts, ProfileRepository, ProfileStore};
pub use session::{SessionRepository, SessionStore};
