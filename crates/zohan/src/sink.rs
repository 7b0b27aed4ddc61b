// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Notification sinks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use zohan_config::SecretString;
use zohan_core::{Event, SlackMessage};

use crate::error::SinkError;
use crate::http;

/// Delivers one event to an external destination.
///
/// Called from a detached task; errors are logged by the caller and dropped.
#[async_trait]
pub trait NotificationSink: Send + Sync {
	/// Short name used in log fields.
	fn name(&self) -> &'static str;

	async fn deliver(&self, event: &Event) -> Result<(), SinkError>;
}

/// Posts a Block Kit message to a chat incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackWebhookSink {
	endpoint: SecretString,
	timeout: Duration,
}

impl SlackWebhookSink {
	pub fn new(endpoint: SecretString, timeout: Duration) -> Self {
		Self { endpoint, timeout }
	}
}

#[async_trait]
impl NotificationSink for SlackWebhookSink {
	fn name(&self) -> &'static str {
		"slack-webhook"
	}

	async fn deliver(&self, event: &Event) -> Result<(), SinkError> {
		let body = serde_json::to_vec(&SlackMessage::from_event(event))?;

		// Built per delivery: the task may run on a short-lived runtime and a
		// pooled connection must not outlive it.
		let client = http::client_with_timeout(self.timeout).map_err(SinkError::Client)?;

		// The webhook URL embeds its token, so strip it from transport errors.
		let response = client
			.post(self.endpoint.expose())
			.header(CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await
			.map_err(|e| SinkError::Transport(e.without_url()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(SinkError::Status {
				status: status.as_u16(),
				body,
			});
		}

		debug!(status = status.as_u16(), "webhook accepted notification");
		Ok(())
	}
}
