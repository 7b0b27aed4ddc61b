// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Notification sink configuration section.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::secret::SecretString;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationConfigLayer {
	pub endpoint: Option<SecretString>,
	pub aux_integration_key: Option<SecretString>,
	pub request_timeout_secs: Option<u64>,
}

impl NotificationConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.endpoint.is_some() {
			self.endpoint = other.endpoint;
		}
		if other.aux_integration_key.is_some() {
			self.aux_integration_key = other.aux_integration_key;
		}
		if other.request_timeout_secs.is_some() {
			self.request_timeout_secs = other.request_timeout_secs;
		}
	}

	pub fn finalize(self) -> NotificationConfig {
		NotificationConfig {
			endpoint: self.endpoint.filter(|e| !e.is_blank()),
			aux_integration_key: self.aux_integration_key.filter(|k| !k.is_blank()),
			request_timeout: Duration::from_secs(
				self
					.request_timeout_secs
					.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
			),
		}
	}
}

/// Where captured errors are forwarded.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationConfig {
	/// Incoming-webhook URL. `None` means log-only.
	pub endpoint: Option<SecretString>,
	/// Reserved for a second integration; carried but never used.
	pub aux_integration_key: Option<SecretString>,
	/// Default timeout applied by the HTTP client to each delivery.
	pub request_timeout: Duration,
}

impl NotificationConfig {
	pub fn is_enabled(&self) -> bool {
		self.endpoint.is_some()
	}
}

impl Default for NotificationConfig {
	fn default() -> Self {
		NotificationConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_is_log_only() {
		let config = NotificationConfig::default();
		assert!(!config.is_enabled());
		assert!(config.aux_integration_key.is_none());
		assert_eq!(config.request_timeout, Duration::from_secs(30));
	}

	#[test]
	fn test_blank_endpoint_is_disabled() {
		let layer = NotificationConfigLayer {
			endpoint: Some(SecretString::new("")),
			..Default::default()
		};
		assert!(!layer.finalize().is_enabled());
	}

	#[test]
	fn test_merge_keeps_base_secret_when_overlay_empty() {
		let mut base = NotificationConfigLayer {
			endpoint: Some(SecretString::new("https://hooks.example.com/a")),
			request_timeout_secs: Some(5),
			..Default::default()
		};
		base.merge(NotificationConfigLayer {
			request_timeout_secs: Some(10),
			..Default::default()
		});
		let config = base.finalize();
		assert_eq!(
			config.endpoint.as_ref().map(|e| e.expose()),
			Some("https://hooks.example.com/a")
		);
		assert_eq!(config.request_timeout, Duration::from_secs(10));
	}

	#[test]
	fn test_deserialize_from_toml() {
		let toml_str = r#"
endpoint = "https://hooks.example.com/services/x"
aux_integration_key = "dsn"
request_timeout_secs = 3
"#;
		let layer: NotificationConfigLayer = toml::from_str(toml_str).unwrap();
		let config = layer.finalize();
		assert!(config.is_enabled());
		assert_eq!(
			config.aux_integration_key.as_ref().map(|k| k.expose()),
			Some("dsn")
		);
		assert_eq!(config.request_timeout, Duration::from_secs(3));
	}
}
