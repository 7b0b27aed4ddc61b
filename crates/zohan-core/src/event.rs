// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The record produced for every captured fault.

use std::backtrace::Backtrace;
use std::error::Error;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::labels::{LabelFormat, Labels};

/// One captured error or panic.
///
/// The stack trace is taken when the event is built, i.e. in the frame that
/// reports the error, not where the error was first produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
	message: String,
	stack_trace: String,
	timestamp: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Labels::is_empty")]
	labels: Labels,
}

impl Event {
	/// Build an event from an error value.
	pub fn capture<E>(error: &E, labels: impl Into<Labels>) -> Self
	where
		E: Error + ?Sized,
	{
		Self::from_message(error.to_string(), labels)
	}

	/// Build an event from a plain description.
	pub fn from_message(message: impl Into<String>, labels: impl Into<Labels>) -> Self {
		Self {
			message: message.into(),
			stack_trace: Backtrace::force_capture().to_string(),
			timestamp: Utc::now(),
			labels: labels.into(),
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn stack_trace(&self) -> &str {
		&self.stack_trace
	}

	pub fn timestamp(&self) -> DateTime<Utc> {
		self.timestamp
	}

	pub fn labels(&self) -> &Labels {
		&self.labels
	}

	/// RFC 3339 with second precision, e.g. `2025-03-14T09:26:53Z`.
	pub fn formatted_timestamp(&self) -> String {
		self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
	}

	/// The multi-line record written to the diagnostic stream.
	pub fn diagnostic_record(&self) -> String {
		format!(
			"Error reported at {}:\nMessage: {}\nLabels: {}\nStack Trace:\n{}\n",
			self.formatted_timestamp(),
			self.message,
			self.labels.render(LabelFormat::Plain),
			self.stack_trace,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io;

	#[test]
	fn test_capture_uses_error_display() {
		let err = io::Error::new(io::ErrorKind::TimedOut, "db timeout");
		let event = Event::capture(&err, Labels::from([("module", "payment")]));
		assert_eq!(event.message(), "db timeout");
		assert_eq!(event.labels().get("module"), Some("payment"));
	}

	#[test]
	fn test_capture_accepts_trait_objects() {
		let err: Box<dyn Error + Send + Sync> = "boxed failure".into();
		let event = Event::capture(err.as_ref(), Labels::new());
		assert_eq!(event.message(), "boxed failure");
		assert!(event.labels().is_empty());
	}

	#[test]
	fn test_stack_trace_is_captured() {
		let event = Event::from_message("boom", Labels::new());
		assert!(!event.stack_trace().trim().is_empty());
	}

	#[test]
	fn test_timestamp_is_now() {
		let before = Utc::now();
		let event = Event::from_message("boom", Labels::new());
		let after = Utc::now();
		assert!(event.timestamp() >= before && event.timestamp() <= after);
	}

	#[test]
	fn test_formatted_timestamp_parses_back() {
		let event = Event::from_message("boom", Labels::new());
		let formatted = event.formatted_timestamp();
		assert!(formatted.ends_with('Z'));
		let parsed = DateTime::parse_from_rfc3339(&formatted).unwrap();
		assert_eq!(parsed.timestamp(), event.timestamp().timestamp());
	}

	#[test]
	fn test_diagnostic_record_layout() {
		let event = Event::from_message(
			"db timeout",
			Labels::from([("module", "payment"), ("severity", "critical")]),
		);
		let record = event.diagnostic_record();
		let mut lines = record.lines();

		assert_eq!(
			lines.next(),
			Some(format!("Error reported at {}:", event.formatted_timestamp()).as_str())
		);
		assert_eq!(lines.next(), Some("Message: db timeout"));
		assert_eq!(
			lines.next(),
			Some("Labels: module: payment, severity: critical")
		);
		assert_eq!(lines.next(), Some("Stack Trace:"));
		assert!(record.ends_with(&format!("{}\n", event.stack_trace())));
	}

	#[test]
	fn test_diagnostic_record_without_labels() {
		let record = Event::from_message("x", Labels::new()).diagnostic_record();
		assert!(record.contains("\nLabels: None\n"));
	}

	#[test]
	fn test_serialize_skips_empty_labels() {
		let json = serde_json::to_value(Event::from_message("x", Labels::new())).unwrap();
		assert!(json.get("labels").is_none());
		assert!(json.get("stack_trace").is_some());
	}
}
