// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The reporter: log every captured error locally, then notify the webhook.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use zohan_config::{SecretString, ZohanConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use zohan_core::{Event, LabelFormat, Labels};

use crate::dispatch::dispatch;
use crate::output::{DiagnosticOutput, StderrOutput};
use crate::sink::{NotificationSink, SlackWebhookSink};

/// Builder for constructing a [`Reporter`].
///
/// The defaults write records to stderr and, when an endpoint is set, post to
/// it with [`SlackWebhookSink`].
#[derive(Clone)]
pub struct ReporterBuilder {
	endpoint: Option<SecretString>,
	aux_integration_key: Option<SecretString>,
	request_timeout: Duration,
	output: Option<Arc<dyn DiagnosticOutput>>,
	sink: Option<Arc<dyn NotificationSink>>,
}

impl ReporterBuilder {
	/// Creates a log-only builder.
	pub fn new() -> Self {
		Self {
			endpoint: None,
			aux_integration_key: None,
			request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
			output: None,
			sink: None,
		}
	}

	/// Takes the notification settings from `config`.
	pub fn config(mut self, config: &ZohanConfig) -> Self {
		self.endpoint = config.notification.endpoint.clone();
		self.aux_integration_key = config.notification.aux_integration_key.clone();
		self.request_timeout = config.notification.request_timeout;
		self
	}

	/// Sets the webhook URL. A blank URL means log-only.
	pub fn endpoint(mut self, url: impl Into<String>) -> Self {
		let url = SecretString::new(url);
		self.endpoint = (!url.is_blank()).then_some(url);
		self
	}

	/// Sets the HTTP timeout for the default webhook sink.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	/// Replaces the destination of the synchronous record.
	pub fn output(mut self, output: Arc<dyn DiagnosticOutput>) -> Self {
		self.output = Some(output);
		self
	}

	/// Replaces the webhook sink. It is only used when an endpoint is set.
	pub fn sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
		self.sink = Some(sink);
		self
	}

	pub fn build(self) -> Reporter {
		let sink = self.endpoint.as_ref().map(|endpoint| {
			self.sink.unwrap_or_else(|| {
				Arc::new(SlackWebhookSink::new(endpoint.clone(), self.request_timeout))
					as Arc<dyn NotificationSink>
			})
		});

		Reporter {
			inner: Arc::new(ReporterInner {
				notification_endpoint: self.endpoint,
				aux_integration_key: self.aux_integration_key,
				output: self.output.unwrap_or_else(|| Arc::new(StderrOutput)),
				sink,
			}),
		}
	}
}

impl Default for ReporterBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct ReporterInner {
	notification_endpoint: Option<SecretString>,
	// Reserved for a second integration; nothing reads it yet.
	aux_integration_key: Option<SecretString>,
	output: Arc<dyn DiagnosticOutput>,
	sink: Option<Arc<dyn NotificationSink>>,
}

/// Captures errors, logs them and forwards them to the chat webhook.
///
/// Holds only immutable configuration; clone it freely or share it across
/// threads and tasks.
///
/// # Example
///
/// ```ignore
/// use zohan::{Labels, Reporter};
///
/// let config = zohan_config::load_config()?;
/// let reporter = Reporter::new(&config);
///
/// if let Err(e) = charge_card() {
///     reporter.report(&e, Labels::from([("module", "payment"), ("severity", "critical")]));
/// }
/// ```
#[derive(Clone)]
pub struct Reporter {
	inner: Arc<ReporterInner>,
}

impl Reporter {
	/// Creates a reporter bound to the notification settings in `config`.
	pub fn new(config: &ZohanConfig) -> Self {
		ReporterBuilder::new().config(config).build()
	}

	pub fn builder() -> ReporterBuilder {
		ReporterBuilder::new()
	}

	/// Report an error.
	///
	/// Builds an [`Event`] (stack trace taken here), writes the diagnostic
	/// record before returning, and schedules the webhook notification
	/// without waiting for it. Never fails.
	pub fn report<E>(&self, error: &E, labels: impl Into<Labels>)
	where
		E: Error + ?Sized,
	{
		self.submit(Event::capture(error, labels));
	}

	/// Report a plain message as if it were an error.
	pub fn report_message(&self, message: impl Into<String>, labels: impl Into<Labels>) {
		self.submit(Event::from_message(message, labels));
	}

	/// True when reported events are forwarded to a webhook.
	pub fn is_notifying(&self) -> bool {
		self.inner.sink.is_some()
	}

	pub fn has_aux_integration(&self) -> bool {
		self.inner.aux_integration_key.is_some()
	}

	fn submit(&self, event: Event) {
		debug!(
			message = %event.message(),
			labels = %event.labels().render(LabelFormat::Plain),
			notify = self.is_notifying(),
			"error captured"
		);

		self.inner.output.write_record(&event.diagnostic_record());

		if let Some(sink) = &self.inner.sink {
			dispatch(Arc::clone(sink), event);
		}
	}
}

impl fmt::Debug for Reporter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Reporter")
			.field("notification_endpoint", &self.inner.notification_endpoint)
			.field("aux_integration_key", &self.inner.aux_integration_key)
			.field("sink", &self.inner.sink.as_ref().map(|s| s.name()))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::SinkError;
	use crate::output::MemoryOutput;
	use async_trait::async_trait;
	use std::io;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Default)]
	struct CountingSink {
		calls: AtomicUsize,
	}

	#[async_trait]
	impl NotificationSink for CountingSink {
		fn name(&self) -> &'static str {
			"counting"
		}

		async fn deliver(&self, _event: &Event) -> Result<(), SinkError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(())
		}
	}

	#[test]
	fn test_new_from_log_only_config() {
		let reporter = Reporter::new(&ZohanConfig::log_only("test"));
		assert!(!reporter.is_notifying());
		assert!(!reporter.has_aux_integration());
	}

	#[test]
	fn test_new_from_config_with_endpoint() {
		let config = ZohanConfig::log_only("test").with_endpoint("https://hooks.example.com/T/B/x");
		let reporter = Reporter::new(&config);
		assert!(reporter.is_notifying());
	}

	#[test]
	fn test_blank_endpoint_is_log_only() {
		let reporter = Reporter::builder().endpoint("   ").build();
		assert!(!reporter.is_notifying());
	}

	#[test]
	fn test_debug_redacts_endpoint() {
		let reporter = Reporter::builder()
			.endpoint("https://hooks.slack.com/services/T/B/very-secret")
			.build();
		let debug = format!("{reporter:?}");
		assert!(!debug.contains("very-secret"));
		assert!(debug.contains("slack-webhook"));
	}

	#[test]
	fn test_db_timeout_scenario_log_only() {
		let output = MemoryOutput::new();
		let sink = Arc::new(CountingSink::default());
		let reporter = Reporter::builder()
			.output(Arc::new(output.clone()))
			.sink(sink.clone())
			.build();

		let err = io::Error::new(io::ErrorKind::TimedOut, "db timeout");
		reporter.report(
			&err,
			Labels::from([("module", "payment"), ("severity", "critical")]),
		);

		let records = output.records();
		assert_eq!(records.len(), 1);
		let record = &records[0];
		assert!(record.contains("Message: db timeout"));
		assert!(record.contains("module: payment"));
		assert!(record.contains("severity: critical"));
		let trace = record.split("Stack Trace:\n").nth(1).unwrap();
		assert!(!trace.trim().is_empty());

		std::thread::sleep(Duration::from_millis(50));
		assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn test_report_message_with_no_labels() {
		let output = MemoryOutput::new();
		let reporter = Reporter::builder().output(Arc::new(output.clone())).build();

		reporter.report_message("cache miss storm", Labels::new());

		let records = output.records();
		assert!(records[0].contains("Message: cache miss storm\nLabels: None\n"));
	}

	#[tokio::test]
	async fn test_record_written_before_return_and_sink_called_once() {
		let output = MemoryOutput::new();
		let sink = Arc::new(CountingSink::default());
		let reporter = Reporter::builder()
			.endpoint("https://hooks.example.com/T/B/x")
			.output(Arc::new(output.clone()))
			.sink(sink.clone())
			.build();

		reporter.report_message("boom", Labels::new());
		assert_eq!(output.records().len(), 1);

		for _ in 0..100 {
			if sink.calls.load(Ordering::SeqCst) == 1 {
				break;
			}
			tokio::time::sleep(Duration::from_millis(10)).await;
		}
		assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_concurrent_reports_produce_one_record_each() {
		let output = MemoryOutput::new();
		let reporter = Reporter::builder().output(Arc::new(output.clone())).build();

		let handles: Vec<_> = (0..16)
			.map(|i| {
				let reporter = reporter.clone();
				std::thread::spawn(move || {
					for j in 0..8 {
						reporter.report_message(
							format!("failure {i}-{j}"),
							Labels::from([("worker", i.to_string())]),
						);
					}
				})
			})
			.collect();
		for handle in handles {
			handle.join().unwrap();
		}

		let records = output.records();
		assert_eq!(records.len(), 16 * 8);
		for record in &records {
			let mut lines = record.lines();
			assert!(lines.next().unwrap().starts_with("Error reported at "));
			let message = lines.next().unwrap();
			let (i, _) = message
				.strip_prefix("Message: failure ")
				.unwrap()
				.split_once('-')
				.unwrap();
			assert_eq!(lines.next().unwrap(), format!("Labels: worker: {i}"));
			assert_eq!(lines.next(), Some("Stack Trace:"));
		}
	}
}
