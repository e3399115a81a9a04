// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Message repository.
//!
//! Authorization happens in the messaging service; this layer only persists
//! and scopes by the ids it is given.

use async_trait::async_trait;
use daycare_server_auth::{Message, MessageId, PrincipalId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{parse_timestamp, parse_uuid};

#[async_trait]
pub trait MessageStore: Send + Sync {
	async fn create_message(&self, message: &Message) -> Result<(), DbError>;
	async fn get_message(&self, id: &MessageId) -> Result<Option<Message>, DbError>;
	async fn list_inbox(&self, recipient_id: &PrincipalId) -> Result<Vec<Message>, DbError>;
	async fn list_sent(&self, sender_id: &PrincipalId) -> Result<Vec<Message>, DbError>;
	async fn mark_read(&self, id: &MessageId) -> Result<bool, DbError>;
	async fn delete_message(&self, id: &MessageId) -> Result<bool, DbError>;
	async fn count_unread(&self, recipient_id: &PrincipalId) -> Result<i64, DbError>;
}

#[async_trait]
impl MessageStore for MessageRepository {
	async fn create_message(&self, message: &Message) -> Result<(), DbError> {
		self.create_message(message).await
	}

	async fn get_message(&self, id: &MessageId) -> Result<Option<Message>, DbError> {
		self.get_message(id).await
	}

	async fn list_inbox(&self, recipient_id: &PrincipalId) -> Result<Vec<Message>, DbError> {
		self.list_inbox(recipient_id).await
	}

	async fn list_sent(&self, sender_id: &PrincipalId) -> Result<Vec<Message>, DbError> {
		self.list_sent(sender_id).await
	}

	async fn mark_read(&self, id: &MessageId) -> Result<bool, DbError> {
		self.mark_read(id).await
	}

	async fn delete_message(&self, id: &MessageId) -> Result<bool, DbError> {
		self.delete_message(id).await
	}

	async fn count_unread(&self, recipient_id: &PrincipalId) -> Result<i64, DbError> {
		self.count_unread(recipient_id).await
	}
}

const MESSAGE_COLUMNS: &str = "id, sender_id, recipient_id, subject, content, read, created_at";

#[derive(Clone)]
pub struct MessageRepository {
	pool: SqlitePool,
}

impl MessageRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, message), fields(message_id = %message.id, sender_id = %message.sender_id, recipient_id = %message.recipient_id))]
	pub async fn create_message(&self, message: &Message) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO messages (id, sender_id, recipient_id, subject, content, read, created_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(message.id.to_string())
		.bind(message.sender_id.to_string())
		.bind(message.recipient_id.to_string())
		.bind(&message.subject)
		.bind(&message.content)
		.bind(message.read as i32)
		.bind(message.created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(message_id = %message.id, "message stored");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(message_id = %id))]
	pub async fn get_message(&self, id: &MessageId) -> Result<Option<Message>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?"
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| parse_message_row(&r)).transpose()
	}

	/// Messages addressed to `recipient_id`, newest first.
	#[tracing::instrument(skip(self), fields(recipient_id = %recipient_id))]
	pub async fn list_inbox(&self, recipient_id: &PrincipalId) -> Result<Vec<Message>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {MESSAGE_COLUMNS} FROM messages WHERE recipient_id = ? ORDER BY created_at DESC, rowid DESC"
		))
		.bind(recipient_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_message_row).collect()
	}

	/// Messages sent by `sender_id`, newest first.
	#[tracing::instrument(skip(self), fields(sender_id = %sender_id))]
	pub async fn list_sent(&self, sender_id: &PrincipalId) -> Result<Vec<Message>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {MESSAGE_COLUMNS} FROM messages WHERE sender_id = ? ORDER BY created_at DESC, rowid DESC"
		))
		.bind(sender_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_message_row).collect()
	}

	/// Set `read = 1`.
	///
	/// # Returns
	/// `false` if no message has this id.
	#[tracing::instrument(skip(self), fields(message_id = %id))]
	pub async fn mark_read(&self, id: &MessageId) -> Result<bool, DbError> {
		let result = sqlx::query("UPDATE messages SET read = 1 WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self), fields(message_id = %id))]
	pub async fn delete_message(&self, id: &MessageId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM messages WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::debug!(message_id = %id, "message deleted");
		}
		Ok(deleted)
	}

	#[tracing::instrument(skip(self), fields(recipient_id = %recipient_id))]
	pub async fn count_unread(&self, recipient_id: &PrincipalId) -> Result<i64, DbError> {
		let count: i64 =
			sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE recipient_id = ? AND read = 0")
				.bind(recipient_id.to_string())
				.fetch_one(&self.pool)
				.await?;
		Ok(count)
	}
}

fn parse_message_row(row: &sqlx::sqlite::SqliteRow) -> Result<Message, DbError> {
	let id: String = row.get("id");
	let sender_id: String = row.get("sender_id");
	let recipient_id: String = row.get("recipient_id");
	let read: i32 = row.get("read");
	let created_at: String = row.get("created_at");

	Ok(Message {
		id: MessageId::new(parse_uuid(&id, "message id")?),
		sender_id: PrincipalId::new(parse_uuid(&sender_id, "sender_id")?),
		recipient_id: PrincipalId::new(parse_uuid(&recipient_id, "recipient_id")?),
		subject: row.get("subject"),
		content: row.get("content"),
		read: read != 0,
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}
