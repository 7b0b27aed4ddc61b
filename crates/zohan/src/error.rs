// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the reporting pipeline.
//!
//! None of these ever reach the code that called `report`; they exist so the
//! delivery path can log precisely what went wrong before dropping the event.

use thiserror::Error;

/// Why a notification could not be delivered.
#[derive(Debug, Error)]
pub enum SinkError {
	/// The HTTP client could not be constructed.
	#[error("failed to build HTTP client: {0}")]
	Client(#[source] reqwest::Error),

	/// The message could not be encoded.
	#[error("failed to serialize notification: {0}")]
	Serialization(#[from] serde_json::Error),

	/// The request never produced a response.
	#[error("failed to send notification: {0}")]
	Transport(#[source] reqwest::Error),

	/// The webhook answered with a non-2xx status.
	#[error("webhook returned status {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, possibly empty.
		body: String,
	},
}

/// Error synthesized from a panic payload that carried no error value.
///
/// Its `Display` is exactly the payload text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PanicError(pub String);
