// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Messaging service.
//!
//! [`MessagingService::send`] runs the authorization checks strictly in this
//! order and stops at the first failure:
//!
//! 1. a sender identity is present
//! 2. every field is present and the recipient id is well formed
//! 3. length bounds, then sanitizing
//! 4. the recipient profile exists and is active
//! 5. the sender profile exists and is active
//! 6. the sender/recipient relationship rule
//!
//! The message insert is the only write and happens after all checks pass.
//! Every check reads the stores again; nothing from an earlier request or
//! from the recipient suggestions is trusted.

use std::sync::Arc;

use daycare_server_api::SendMessageRequest;
use daycare_server_auth::{
	has_care_link, relationship_requirement, validate_message_fields, Message, MessageId,
	PrincipalId, Profile, PublicProfile, RelationshipRequirement, RequestIdentity, Role,
	SendDenial,
};
use daycare_server_db::{CareStore, DbError, MessageStore, ProfileStore};
use tracing::instrument;

/// Failure of [`MessagingService::send`].
#[derive(Debug, thiserror::Error)]
pub enum SendMessageError {
	#[error(transparent)]
	Denied(#[from] SendDenial),

	#[error("store error: {0}")]
	Store(#[from] DbError),
}

/// Failure of an action on an existing message.
#[derive(Debug, thiserror::Error)]
pub enum MessageActionError {
	#[error("message not found")]
	NotFound,

	#[error("not permitted to act on this message")]
	Forbidden,

	#[error("store error: {0}")]
	Store(#[from] DbError),
}

pub struct MessagingService {
	profiles: Arc<dyn ProfileStore>,
	care: Arc<dyn CareStore>,
	messages: Arc<dyn MessageStore>,
}

impl MessagingService {
	pub fn new(
		profiles: Arc<dyn ProfileStore>,
		care: Arc<dyn CareStore>,
		messages: Arc<dyn MessageStore>,
	) -> Self {
		Self {
			profiles,
			care,
			messages,
		}
	}

	/// Authorize and store a message. Returns the new message's id.
	#[instrument(
		skip(self, sender, request),
		fields(sender_id = tracing::field::Empty, message_id = tracing::field::Empty)
	)]
	pub async fn send(
		&self,
		sender: Option<&RequestIdentity>,
		request: &SendMessageRequest,
	) -> Result<MessageId, SendMessageError> {
		let Some(sender) = sender else {
			return Err(SendDenial::Unauthenticated.into());
		};
		let span = tracing::Span::current();
		span.record("sender_id", tracing::field::display(&sender.principal_id));

		let validated =
			validate_message_fields(&request.recipient_id, &request.subject, &request.content)?;

		let recipient = self
			.profiles
			.get_profile(&validated.recipient_id)
			.await?
			.ok_or(SendDenial::RecipientNotFound)?;
		if !recipient.active_status {
			return Err(SendDenial::RecipientInactive.into());
		}

		let sender_profile = match self.profiles.get_profile(&sender.principal_id).await? {
			Some(profile) if profile.active_status => profile,
			_ => return Err(SendDenial::SenderVerificationFailed.into()),
		};

		match relationship_requirement(
			sender_profile.id,
			sender_profile.role,
			recipient.id,
			recipient.role,
		) {
			RelationshipRequirement::Always => {}
			RelationshipRequirement::CareLink {
				parent_id,
				teacher_id,
			} => {
				if !self.care_link_exists(parent_id, teacher_id).await? {
					tracing::debug!("send denied: no care relationship");
					return Err(SendDenial::NoRelationship.into());
				}
			}
			RelationshipRequirement::Deny(kind) => return Err(SendDenial::from(kind).into()),
		}

		let message = Message::new(
			sender_profile.id,
			recipient.id,
			validated.subject,
			validated.content,
		);
		self.messages.create_message(&message).await?;

		span.record("message_id", tracing::field::display(&message.id));
		tracing::info!("message sent");
		Ok(message.id)
	}

	/// Whether the parent has an active child with an active assignment to
	/// the teacher.
	async fn care_link_exists(
		&self,
		parent_id: PrincipalId,
		teacher_id: PrincipalId,
	) -> Result<bool, DbError> {
		let children = self.care.list_active_children_for_parent(&parent_id).await?;
		if children.is_empty() {
			return Ok(false);
		}
		let assignments = self
			.care
			.list_active_assignments_for_teacher(&teacher_id)
			.await?;
		Ok(has_care_link(teacher_id, &children, &assignments))
	}

	/// Mark a message read. Only the recipient may do this; repeating it is a
	/// no-op.
	#[instrument(skip(self, actor), fields(actor_id = %actor.principal_id))]
	pub async fn mark_read(
		&self,
		actor: &RequestIdentity,
		message_id: MessageId,
	) -> Result<(), MessageActionError> {
		let message = self
			.messages
			.get_message(&message_id)
			.await?
			.ok_or(MessageActionError::NotFound)?;

		if message.recipient_id != actor.principal_id {
			return Err(MessageActionError::Forbidden);
		}

		if !message.read {
			self.messages.mark_read(&message_id).await?;
		}
		Ok(())
	}

	/// Delete a message. Allowed for its sender and for admins.
	#[instrument(skip(self, actor), fields(actor_id = %actor.principal_id))]
	pub async fn delete(
		&self,
		actor: &RequestIdentity,
		message_id: MessageId,
	) -> Result<(), MessageActionError> {
		let message = self
			.messages
			.get_message(&message_id)
			.await?
			.ok_or(MessageActionError::NotFound)?;

		if message.sender_id != actor.principal_id && !actor.is_admin() {
			return Err(MessageActionError::Forbidden);
		}

		if !self.messages.delete_message(&message_id).await? {
			return Err(MessageActionError::NotFound);
		}
		tracing::info!("message deleted");
		Ok(())
	}

	#[instrument(skip(self, actor), fields(actor_id = %actor.principal_id))]
	pub async fn list_inbox(&self, actor: &RequestIdentity) -> Result<Vec<Message>, DbError> {
		self.messages.list_inbox(&actor.principal_id).await
	}

	#[instrument(skip(self, actor), fields(actor_id = %actor.principal_id))]
	pub async fn list_sent(&self, actor: &RequestIdentity) -> Result<Vec<Message>, DbError> {
		self.messages.list_sent(&actor.principal_id).await
	}

	pub async fn unread_count(&self, actor: &RequestIdentity) -> Result<i64, DbError> {
		self.messages.count_unread(&actor.principal_id).await
	}

	/// Profiles the actor is likely allowed to message.
	///
	/// This is a convenience for the compose form only; [`Self::send`]
	/// applies the rules again.
	#[instrument(skip(self, actor), fields(actor_id = %actor.principal_id))]
	pub async fn allowed_recipients(
		&self,
		actor: &RequestIdentity,
	) -> Result<Vec<PublicProfile>, DbError> {
		let Some(role) = actor.role else {
			return Ok(Vec::new());
		};

		let linked: Vec<PrincipalId> = match role {
			Role::Admin => Vec::new(),
			Role::Teacher => {
				self.care
					.list_parent_ids_for_teacher(&actor.principal_id)
					.await?
			}
			Role::Parent => {
				self.care
					.list_teacher_ids_for_parent(&actor.principal_id)
					.await?
			}
		};

		let profiles = self.profiles.list_profiles().await?;
		Ok(profiles
			.iter()
			.filter(|p| p.id != actor.principal_id && p.active_status)
			.filter(|p| suggested_for(role, p, &linked))
			.map(Profile::to_public)
			.collect())
	}
}

fn suggested_for(sender: Role, candidate: &Profile, linked: &[PrincipalId]) -> bool {
	match (sender, candidate.role) {
		(_, None) => false,
		(Role::Admin, Some(_)) => true,
		(Role::Teacher, Some(Role::Admin | Role::Teacher)) => true,
		(Role::Teacher, Some(Role::Parent)) => linked.contains(&candidate.id),
		(Role::Parent, Some(Role::Admin)) => true,
		(Role::Parent, Some(Role::Teacher)) => linked.contains(&candidate.id),
		(Role::Parent, Some(Role::Parent)) => false,
	}
}
