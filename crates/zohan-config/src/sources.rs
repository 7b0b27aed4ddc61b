// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment
//! variables.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ZohanConfigLayer;
use crate::secret::SecretString;
use crate::sections::{LoggingConfigLayer, NotificationConfigLayer};

pub const ENV_ENVIRONMENT: &str = "ZOHAN_ENVIRONMENT";
pub const ENV_LOG_LEVEL: &str = "ZOHAN_LOG_LEVEL";
pub const ENV_NOTIFICATION_ENDPOINT: &str = "ZOHAN_NOTIFICATION_ENDPOINT";
pub const ENV_AUX_INTEGRATION_KEY: &str = "ZOHAN_AUX_INTEGRATION_KEY";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "ZOHAN_REQUEST_TIMEOUT_SECS";

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
	fn load(&self) -> Result<ZohanConfigLayer, ConfigError>;
}

/// Built-in defaults source. Everything that has a default is filled in at
/// finalize time, so this layer is empty.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ZohanConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ZohanConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/zohan/zohan.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ZohanConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ZohanConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ZohanConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Environment variable source.
///
/// Convention: `ZOHAN_<FIELD>`. Empty values are treated as unset.
pub struct EnvSource {
	lookup: EnvLookup,
}

impl EnvSource {
	/// Reads the process environment.
	pub fn new() -> Self {
		Self::with_lookup(|name| std::env::var(name).ok())
	}

	/// Reads variables through `lookup` instead of the process environment.
	pub fn with_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String> + Send + Sync + 'static,
	{
		Self {
			lookup: Box::new(lookup),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		(self.lookup)(name).filter(|s| !s.trim().is_empty())
	}

	fn u64_var(&self, name: &str) -> Result<Option<u64>, ConfigError> {
		match self.var(name) {
			Some(v) => v.trim().parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid u64 value '{v}'"),
			}),
			None => Ok(None),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ZohanConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ZohanConfigLayer {
			environment: self.var(ENV_ENVIRONMENT),
			logging: Some(LoggingConfigLayer {
				level: self.var(ENV_LOG_LEVEL),
			}),
			notification: Some(NotificationConfigLayer {
				endpoint: self.var(ENV_NOTIFICATION_ENDPOINT).map(SecretString::new),
				aux_integration_key: self.var(ENV_AUX_INTEGRATION_KEY).map(SecretString::new),
				request_timeout_secs: self.u64_var(ENV_REQUEST_TIMEOUT_SECS)?,
			}),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	fn env_from(pairs: &[(&str, &str)]) -> EnvSource {
		let vars: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		EnvSource::with_lookup(move |name| vars.get(name).cloned())
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Defaults < Precedence::ConfigFile);
		assert!(Precedence::ConfigFile < Precedence::Environment);
	}

	#[test]
	fn test_env_source_reads_all_fields() {
		let source = env_from(&[
			(ENV_ENVIRONMENT, "production"),
			(ENV_LOG_LEVEL, "DEBUG"),
			(ENV_NOTIFICATION_ENDPOINT, "https://hooks.example.com/x"),
			(ENV_AUX_INTEGRATION_KEY, "dsn"),
			(ENV_REQUEST_TIMEOUT_SECS, "12"),
		]);
		let layer = source.load().unwrap();
		assert_eq!(layer.environment.as_deref(), Some("production"));
		assert_eq!(layer.logging.unwrap().level.as_deref(), Some("DEBUG"));
		let notification = layer.notification.unwrap();
		assert_eq!(
			notification.endpoint.as_ref().map(|e| e.expose()),
			Some("https://hooks.example.com/x")
		);
		assert_eq!(notification.request_timeout_secs, Some(12));
	}

	#[test]
	fn test_env_source_ignores_empty_values() {
		let source = env_from(&[(ENV_ENVIRONMENT, ""), (ENV_NOTIFICATION_ENDPOINT, "  ")]);
		let layer = source.load().unwrap();
		assert!(layer.environment.is_none());
		assert!(layer.notification.unwrap().endpoint.is_none());
	}

	#[test]
	fn test_env_source_rejects_bad_timeout() {
		let source = env_from(&[(ENV_REQUEST_TIMEOUT_SECS, "soon")]);
		let err = source.load().unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_REQUEST_TIMEOUT_SECS));
	}

	#[test]
	fn test_toml_source_missing_file_is_empty() {
		let layer = TomlSource::new("/nonexistent/zohan.toml").load().unwrap();
		assert!(layer.environment.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "environment = \"staging\"\n[logging]\nlevel = \"WARN\"").unwrap();
		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(layer.environment.as_deref(), Some("staging"));
		assert_eq!(layer.logging.unwrap().level.as_deref(), Some("WARN"));
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "environment = [").unwrap();
		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}
}
