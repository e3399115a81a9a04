// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Periodic removal of expired sessions.

use std::{sync::Arc, time::Duration};

use daycare_server_db::{DbError, SessionStore};
use tokio::task::JoinHandle;

pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Delete expired sessions once. Returns the number removed.
pub async fn run_once(store: &dyn SessionStore) -> Result<u64, DbError> {
	let removed = store.cleanup_expired_sessions().await?;
	if removed > 0 {
		tracing::info!(removed, "Cleaned up expired sessions");
	} else {
		tracing::debug!("No expired sessions to clean up");
	}
	Ok(removed)
}

/// Run [`run_once`] every `interval` until the task is aborted.
pub fn spawn(store: Arc<dyn SessionStore>, interval: Duration) -> JoinHandle<()> {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(interval);
		loop {
			ticker.tick().await;
			if let Err(e) = run_once(store.as_ref()).await {
				tracing::error!(error = %e, "Session cleanup failed");
			}
		}
	})
}
