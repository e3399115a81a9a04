// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and gatekeeper configuration.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const DEFAULT_COOKIE_NAME: &str = "daycare_session";
const DEFAULT_SESSION_TTL_HOURS: u64 = 24 * 14;

/// What the gatekeeper does when a store or provider call fails unexpectedly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateFailureMode {
	/// Redirect to access-denied with reason `unauthorized`.
	#[default]
	Closed,
	/// Let the request through without an identity.
	Open,
}

impl GateFailureMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			GateFailureMode::Closed => "closed",
			GateFailureMode::Open => "open",
		}
	}
}

impl fmt::Display for GateFailureMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for GateFailureMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"closed" => Ok(GateFailureMode::Closed),
			"open" => Ok(GateFailureMode::Open),
			other => Err(format!("expected 'closed' or 'open', got '{other}'")),
		}
	}
}

/// Authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub environment: String,
	pub session_cookie_name: String,
	pub session_ttl_hours: u64,
	pub gate_failure_mode: GateFailureMode,
}

impl Default for AuthConfig {
	fn default() -> Self {
		AuthConfigLayer::default().finalize()
	}
}

impl AuthConfig {
	pub fn is_production(&self) -> bool {
		self.environment.eq_ignore_ascii_case("production")
	}
}

/// Authentication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub environment: Option<String>,
	#[serde(default)]
	pub session_cookie_name: Option<String>,
	#[serde(default)]
	pub session_ttl_hours: Option<u64>,
	#[serde(default)]
	pub gate_failure_mode: Option<GateFailureMode>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.environment.is_some() {
			self.environment = other.environment;
		}
		if other.session_cookie_name.is_some() {
			self.session_cookie_name = other.session_cookie_name;
		}
		if other.session_ttl_hours.is_some() {
			self.session_ttl_hours = other.session_ttl_hours;
		}
		if other.gate_failure_mode.is_some() {
			self.gate_failure_mode = other.gate_failure_mode;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			environment: self
				.environment
				.unwrap_or_else(|| "development".to_string()),
			session_cookie_name: self
				.session_cookie_name
				.unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
			session_ttl_hours: self.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS),
			gate_failure_mode: self.gate_failure_mode.unwrap_or_default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_fail_closed() {
		let config = AuthConfig::default();
		assert_eq!(config.gate_failure_mode, GateFailureMode::Closed);
		assert_eq!(config.session_cookie_name, "daycare_session");
		assert_eq!(config.session_ttl_hours, 336);
		assert!(!config.is_production());
	}

	#[test]
	fn failure_mode_parses_case_insensitively() {
		assert_eq!("OPEN".parse::<GateFailureMode>(), Ok(GateFailureMode::Open));
		assert_eq!("closed".parse::<GateFailureMode>(), Ok(GateFailureMode::Closed));
		assert!("ajar".parse::<GateFailureMode>().is_err());
	}

	#[test]
	fn failure_mode_deserializes_from_toml() {
		let layer: AuthConfigLayer = toml::from_str(r#"gate_failure_mode = "open""#).unwrap();
		assert_eq!(layer.gate_failure_mode, Some(GateFailureMode::Open));
	}

	#[test]
	fn merge_overrides_set_fields() {
		let mut base = AuthConfigLayer {
			environment: Some("staging".to_string()),
			session_ttl_hours: Some(1),
			..Default::default()
		};
		base.merge(AuthConfigLayer {
			session_ttl_hours: Some(8),
			..Default::default()
		});
		let config = base.finalize();
		assert_eq!(config.environment, "staging");
		assert_eq!(config.session_ttl_hours, 8);
	}
}
