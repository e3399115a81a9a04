// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access-control core for the daycare server.
//!
//! Everything in this crate is free of I/O:
//!
//! - [`route_policy`] - which role may visit which path
//! - [`gate`] - path classification and redirect targets for the gatekeeper
//! - [`client_guard`] - render-time re-check of the route policy
//! - [`messaging`] - field validation and the sender/recipient relationship matrix
//! - [`sanitize`] - markup stripping for stored message text
//! - [`middleware`] - session credential extraction and [`RequestIdentity`]

pub mod care;
pub mod client_guard;
pub mod gate;
pub mod message;
pub mod messaging;
pub mod middleware;
pub mod profile;
pub mod route_policy;
pub mod sanitize;
pub mod session;
pub mod types;

pub use care::{has_care_link, Child, TeacherAssignment};
pub use client_guard::{ClientGuard, GuardOutcome, RoleState};
pub use gate::{
	access_denied_redirect, classify_path, login_redirect, policy_decision, role_scoped_decision,
	AccessDeniedReason, GateDecision, PathClass, ACCESS_DENIED_PATH, LOGIN_PATH, REGISTER_PATH,
};
pub use message::Message;
pub use messaging::{
	relationship_requirement, validate_message_fields, MessageField, RelationshipRequirement,
	SendDenial, SendDenialKind, ValidatedMessage, MAX_CONTENT_CHARS, MAX_SUBJECT_CHARS,
};
pub use middleware::{
	extract_bearer_token, extract_session_cookie, extract_session_cookie_with_name,
	extract_session_token, generate_session_token, hash_session_token, RequestIdentity,
	SESSION_COOKIE_NAME,
};
pub use profile::{default_display_name, Principal, Profile, PublicProfile};
pub use route_policy::{allowed_prefixes, is_allowed, is_dashboard_path, normalize_path};
pub use sanitize::sanitize_text;
pub use session::{Session, SESSION_TTL_HOURS};
pub use types::{
	AssignmentId, ChildId, MessageId, PrincipalId, RecordStatus, Role, SessionId, UnknownRole,
	UNASSIGNED_ROLE,
};
