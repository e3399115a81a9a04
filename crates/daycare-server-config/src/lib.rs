// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for the daycare server.
//!
//! - Layered configuration from defaults, a TOML file and the environment
//! - Consistent environment variable naming (`DAYCARE_SERVER_*`)
//! - Cross-field validation before the server starts
//!
//! # Usage
//!
//! ```ignore
//! use daycare_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`DAYCARE_SERVER_*`)
/// 2. Config file (`/etc/daycare/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&auth)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		environment = %auth.environment,
		gate_failure_mode = %auth.gate_failure_mode,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		auth,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(auth: &AuthConfig) -> Result<(), ConfigError> {
	if auth.gate_failure_mode == GateFailureMode::Open && auth.is_production() {
		return Err(ConfigError::Validation(
			"DAYCARE_SERVER_GATE_FAILURE_MODE=open is set while DAYCARE_SERVER_ENV=production. \
			 The gatekeeper must fail closed in production."
				.to_string(),
		));
	}

	if auth.session_ttl_hours == 0 {
		return Err(ConfigError::Validation(
			"session_ttl_hours must be greater than zero".to_string(),
		));
	}

	if auth.session_cookie_name.is_empty()
		|| !auth
			.session_cookie_name
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
	{
		return Err(ConfigError::InvalidValue {
			key: "auth.session_cookie_name".to_string(),
			message: "must be non-empty and contain only ASCII letters, digits, '_' or '-'"
				.to_string(),
		});
	}

	Ok(())
}
