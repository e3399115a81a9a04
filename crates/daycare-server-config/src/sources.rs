// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LoggingConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/daycare/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: DAYCARE_SERVER_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(load_database_from_env()?),
			auth: Some(load_auth_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_parse<T>(name: &str) -> Result<Option<T>, ConfigError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|e| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid value '{v}': {e}"),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("DAYCARE_SERVER_HOST"),
		port: env_parse("DAYCARE_SERVER_PORT")?,
		base_url: env_var("DAYCARE_SERVER_BASE_URL"),
	})
}

fn load_database_from_env() -> Result<DatabaseConfigLayer, ConfigError> {
	Ok(DatabaseConfigLayer {
		url: env_var("DAYCARE_SERVER_DATABASE_URL"),
	})
}

fn load_auth_from_env() -> Result<AuthConfigLayer, ConfigError> {
	Ok(AuthConfigLayer {
		environment: env_var("DAYCARE_SERVER_ENV"),
		session_cookie_name: env_var("DAYCARE_SERVER_SESSION_COOKIE_NAME"),
		session_ttl_hours: env_parse("DAYCARE_SERVER_SESSION_TTL_HOURS")?,
		gate_failure_mode: env_parse("DAYCARE_SERVER_GATE_FAILURE_MODE")?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	Ok(LoggingConfigLayer {
		level: env_var("DAYCARE_SERVER_LOG_LEVEL"),
		format: env_parse("DAYCARE_SERVER_LOG_FORMAT")?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.auth.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/config.toml").load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[auth]\ngate_failure_mode = \"open\"").unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert!(layer.auth.unwrap().gate_failure_mode.is_some());
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[auth\nbroken").unwrap();

		assert!(matches!(
			TomlSource::new(file.path()).load(),
			Err(ConfigError::TomlParse { .. })
		));
	}

	#[test]
	fn test_env_parse_missing_is_none() {
		let value: Option<u16> = env_parse("DAYCARE_SERVER_TEST_UNSET_VARIABLE").unwrap();
		assert!(value.is_none());
	}
}
