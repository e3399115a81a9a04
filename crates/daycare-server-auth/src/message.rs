// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MessageId, PrincipalId};

/// A stored direct message.
///
/// `subject` and `content` are sanitized before insertion and never hold
/// markup. Only the recipient may flip `read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	pub id: MessageId,
	pub sender_id: PrincipalId,
	pub recipient_id: PrincipalId,
	pub subject: String,
	pub content: String,
	pub read: bool,
	pub created_at: DateTime<Utc>,
}

impl Message {
	/// Build a new unread message.
	pub fn new(
		sender_id: PrincipalId,
		recipient_id: PrincipalId,
		subject: String,
		content: String,
	) -> Self {
		Self {
			id: MessageId::generate(),
			sender_id,
			recipient_id,
			subject,
			content,
			read: false,
			created_at: Utc::now(),
		}
	}

	pub fn is_participant(&self, principal_id: PrincipalId) -> bool {
		self.sender_id == principal_id || self.recipient_id == principal_id
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_message_is_unread() {
		let msg = Message::new(
			PrincipalId::generate(),
			PrincipalId::generate(),
			"Hi".to_string(),
			"Body".to_string(),
		);
		assert!(!msg.read);
	}

	#[test]
	fn participants_are_sender_and_recipient() {
		let sender = PrincipalId::generate();
		let recipient = PrincipalId::generate();
		let msg = Message::new(sender, recipient, "s".to_string(), "c".to_string());

		assert!(msg.is_participant(sender));
		assert!(msg.is_participant(recipient));
		assert!(!msg.is_participant(PrincipalId::generate()));
	}
}
