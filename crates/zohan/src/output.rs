// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Destinations for the synchronous diagnostic record.

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Receives one fully rendered record per reported event.
///
/// Implementations must write the record as a unit so that records from
/// concurrent reporters never interleave, and must not fail the caller.
pub trait DiagnosticOutput: Send + Sync {
	fn write_record(&self, record: &str);
}

/// Writes records to the process's standard error stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrOutput;

impl DiagnosticOutput for StderrOutput {
	fn write_record(&self, record: &str) {
		// Holding the lock for the whole record keeps concurrent records apart.
		let mut stderr = std::io::stderr().lock();
		let _ = stderr
			.write_all(record.as_bytes())
			.and_then(|()| stderr.flush());
	}
}

/// Emits each record as a single `tracing` error event, for hosts that route
/// all diagnostics through their subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOutput;

impl DiagnosticOutput for TracingOutput {
	fn write_record(&self, record: &str) {
		tracing::error!(target: "zohan::report", "{}", record.trim_end());
	}
}

/// Keeps records in memory. Cloning shares the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
	records: Arc<Mutex<Vec<String>>>,
}

impl MemoryOutput {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of every record written so far.
	pub fn records(&self) -> Vec<String> {
		self
			.records
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.clone()
	}
}

impl DiagnosticOutput for MemoryOutput {
	fn write_record(&self, record: &str) {
		self
			.records
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.push(record.to_string());
	}
}
