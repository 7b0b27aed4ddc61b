// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: report an error and recover a panic with zohan.
//!
//! Run with:
//!   ZOHAN_ENVIRONMENT=development \
//!   ZOHAN_NOTIFICATION_ENDPOINT=https://hooks.slack.com/services/... \
//!   cargo run --example capture -p zohan
//!
//! Without `ZOHAN_NOTIFICATION_ENDPOINT` the example runs log-only.

use std::io;
use std::time::Duration;

use zohan::{Labels, PanicGuard, Reporter, ZohanConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let config = match zohan_config::load_config() {
		Ok(config) => config,
		Err(e) => {
			eprintln!("Falling back to log-only configuration: {e}");
			ZohanConfig::log_only("development")
		}
	};
	zohan::logging::init(&config.logging)?;

	let reporter = Reporter::new(&config);
	println!("Reporter ready (notifying: {})", reporter.is_notifying());

	// A failed call reported with labels
	let err = io::Error::new(io::ErrorKind::TimedOut, "db timeout");
	reporter.report(
		&err,
		Labels::from([("module", "payment"), ("severity", "critical")]),
	);

	// A panicking task is recovered at the guard
	let guard = PanicGuard::new(&config).labels([("task", "ledger-sync")]);
	let outcome: Option<()> = guard
		.spawn(async {
			panic!("simulated panic for testing");
		})
		.await?;
	println!("Guarded task finished (recovered: {})", outcome.is_none());

	// Same for a plain OS thread
	let handle = zohan::spawn_thread_guarded(&config, || -> u32 {
		panic!("simulated panic in thread");
	})?;
	if handle.join().is_ok() {
		println!("Guarded thread joined");
	}

	// Notifications are fire-and-forget; give them a moment to leave.
	tokio::time::sleep(Duration::from_secs(2)).await;
	println!("Done");

	Ok(())
}
