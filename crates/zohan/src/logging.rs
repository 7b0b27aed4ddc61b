// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracing subscriber setup for binaries embedding the reporter.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;
use zohan_config::LoggingConfig;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
	#[error("invalid log level '{level}': {source}")]
	InvalidLevel {
		level: String,
		#[source]
		source: tracing_subscriber::filter::ParseError,
	},

	#[error("a global tracing subscriber is already installed: {0}")]
	AlreadyInitialized(#[from] TryInitError),
}

/// Map a configured level name onto a `tracing` filter directive.
///
/// `WARNING` and the fatal-style names found in other logging stacks are
/// folded onto `warn` and `error`; anything else is lower-cased and passed
/// through, so full directives like `zohan=debug,info` also work.
pub fn level_directive(level: &str) -> String {
	match level.trim().to_ascii_uppercase().as_str() {
		"WARNING" => "warn".to_string(),
		"FATAL" | "PANIC" | "CRITICAL" => "error".to_string(),
		_ => level.trim().to_ascii_lowercase(),
	}
}

/// Build the filter: `RUST_LOG` when set, else the configured level.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
	if let Ok(filter) = EnvFilter::try_from_default_env() {
		return Ok(filter);
	}
	EnvFilter::try_new(level_directive(&config.level)).map_err(|source| {
		LoggingError::InvalidLevel {
			level: config.level.clone(),
			source,
		}
	})
}

/// Install a global subscriber writing human-readable lines to stderr.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
	tracing_subscriber::registry()
		.with(env_filter(config)?)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.try_init()?;
	Ok(())
}
