// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the zohan error reporter.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Fail-fast validation of the required options
//! - [`SecretString`] so webhook URLs never end up in logs
//!
//! Configuration is loaded once at startup and then handed, read-only, to
//! every reporter. Nothing here is global.
//!
//! # Usage
//!
//! ```ignore
//! let config = zohan_config::load_config()?;
//! let reporter = zohan::Reporter::new(&config);
//! ```

pub mod error;
pub mod layer;
pub mod secret;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ZohanConfigLayer;
pub use secret::{SecretString, REDACTED};
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, ENV_AUX_INTEGRATION_KEY,
	ENV_ENVIRONMENT, ENV_LOG_LEVEL, ENV_NOTIFICATION_ENDPOINT, ENV_REQUEST_TIMEOUT_SECS,
};

use tracing::{debug, info};

/// Fully resolved, immutable configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ZohanConfig {
	/// Deployment environment, e.g. `production` or `development`.
	pub environment: String,
	pub logging: LoggingConfig,
	pub notification: NotificationConfig,
}

impl ZohanConfig {
	/// Configuration that only logs locally and never calls a webhook.
	pub fn log_only(environment: impl Into<String>) -> Self {
		Self {
			environment: environment.into(),
			logging: LoggingConfig::default(),
			notification: NotificationConfig::default(),
		}
	}

	/// Replaces the notification endpoint. A blank URL disables notifications.
	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		let endpoint = SecretString::new(endpoint);
		self.notification.endpoint = (!endpoint.is_blank()).then_some(endpoint);
		self
	}

	pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
		self.logging.level = level.into();
		self
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`ZOHAN_*`)
/// 2. Config file (`/etc/zohan/zohan.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ZohanConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource::new()),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ZohanConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource::new()),
	])
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<ZohanConfig, ConfigError> {
	load_from_sources(vec![Box::new(DefaultsSource), Box::new(EnvSource::new())])
}

/// Merge the given sources in precedence order and validate the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ZohanConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ZohanConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize a merged layer into resolved config. Environment and endpoint
/// are both required.
pub fn finalize(layer: ZohanConfigLayer) -> Result<ZohanConfig, ConfigError> {
	let environment = layer
		.environment
		.filter(|e| !e.trim().is_empty())
		.ok_or(ConfigError::MissingField {
			field: "environment",
			env_var: ENV_ENVIRONMENT,
		})?;
	let logging = layer.logging.unwrap_or_default().finalize();
	let notification = layer.notification.unwrap_or_default().finalize();

	if !notification.is_enabled() {
		return Err(ConfigError::MissingField {
			field: "notification endpoint",
			env_var: ENV_NOTIFICATION_ENDPOINT,
		});
	}

	info!(
		environment = %environment,
		log_level = %logging.level,
		notifications_enabled = notification.is_enabled(),
		aux_integration_configured = notification.aux_integration_key.is_some(),
		"zohan configuration loaded"
	);

	Ok(ZohanConfig {
		environment,
		logging,
		notification,
	})
}
