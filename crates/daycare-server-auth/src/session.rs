// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{PrincipalId, SessionId};

/// Default session lifetime, extended on every gated request.
pub const SESSION_TTL_HOURS: i64 = 24 * 14;

/// A browser or API session issued by the identity provider.
///
/// Only the SHA-256 hash of the token is persisted; the struct never holds
/// the raw token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	pub id: SessionId,
	pub principal_id: PrincipalId,
	pub created_at: DateTime<Utc>,
	pub last_used_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

impl Session {
	pub fn new(principal_id: PrincipalId, ttl: Duration) -> Self {
		let now = Utc::now();
		Self {
			id: SessionId::generate(),
			principal_id,
			created_at: now,
			last_used_at: now,
			expires_at: now + ttl,
		}
	}

	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		self.expires_at <= now
	}
}
