// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authentication and authorization.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs ([`PrincipalId`],
//!   [`ChildId`], [`MessageId`], ...) so a child id can never be passed where
//!   a profile id is expected
//! - **Roles**: the three assignable roles ([`Role`]); an unassigned profile
//!   carries `Option::<Role>::None`
//! - **Record status**: soft-delete state shared by children and assignments
//!   ([`RecordStatus`])
//!
//! All ID types serialize transparently as UUID strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(
	PrincipalId,
	"Identity issued by the session provider. A profile shares its principal's id."
);
define_id_type!(SessionId, "Unique identifier for a session.");
define_id_type!(ChildId, "Unique identifier for an enrolled child.");
define_id_type!(AssignmentId, "Unique identifier for a teacher assignment.");
define_id_type!(MessageId, "Unique identifier for a message.");

// =============================================================================
// Roles
// =============================================================================

/// Assignable application roles.
///
/// A profile without a role is *unassigned* and is represented as
/// `Option::<Role>::None` wherever a profile's role is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	/// Staff with access to every area.
	Admin,
	/// Care staff; sees assigned children.
	Teacher,
	/// Guardian of one or more children.
	Parent,
}

/// Stored representation of an unassigned role.
pub const UNASSIGNED_ROLE: &str = "unassigned";

impl Role {
	/// Returns all assignable roles.
	pub fn all() -> &'static [Role] {
		&[Role::Admin, Role::Teacher, Role::Parent]
	}

	/// The string stored in the `profiles.role` column.
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::Admin => "admin",
			Role::Teacher => "teacher",
			Role::Parent => "parent",
		}
	}

	/// Landing page for this role under the dashboard namespace.
	pub fn home_path(&self) -> &'static str {
		match self {
			Role::Admin => "/dashboard/admin",
			Role::Teacher => "/dashboard/teacher",
			Role::Parent => "/dashboard/parent",
		}
	}

	/// Parse a stored role column. Anything that is not an assignable role
	/// (including `unassigned` and unknown strings) maps to `None`.
	pub fn parse_stored(value: &str) -> Option<Role> {
		value.parse().ok()
	}

	/// Inverse of [`Role::parse_stored`].
	pub fn to_stored(role: Option<Role>) -> &'static str {
		role.map(|r| r.as_str()).unwrap_or(UNASSIGNED_ROLE)
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when a string is not an assignable role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
	type Err = UnknownRole;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"admin" => Ok(Role::Admin),
			"teacher" => Ok(Role::Teacher),
			"parent" => Ok(Role::Parent),
			other => Err(UnknownRole(other.to_string())),
		}
	}
}

// =============================================================================
// Record Status
// =============================================================================

/// Soft-delete status for children and teacher assignments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
	#[default]
	Active,
	Inactive,
}

impl RecordStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			RecordStatus::Active => "active",
			RecordStatus::Inactive => "inactive",
		}
	}

	pub fn is_active(&self) -> bool {
		matches!(self, RecordStatus::Active)
	}
}

impl fmt::Display for RecordStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for RecordStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"active" => Ok(RecordStatus::Active),
			"inactive" => Ok(RecordStatus::Inactive),
			other => Err(format!("unknown status: {other}")),
		}
	}
}
