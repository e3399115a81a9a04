// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Daycare server.
//!
//! Serves the role dashboards behind the edge [`gatekeeper`] and the JSON
//! API for messaging and profile administration.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod dashboard;
pub mod error;
pub mod gatekeeper;
pub mod messaging;
pub mod routes;
pub mod session_cleanup;
pub mod validation;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use daycare_server_config::ServerConfig;
pub use error::ServerError;
pub use messaging::{MessageActionError, MessagingService, SendMessageError};
