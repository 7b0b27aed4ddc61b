// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error and panic reporting with chat webhook notifications.
//!
//! Every captured error is logged synchronously with its labels and a stack
//! trace, then forwarded to an incoming webhook on a detached task. Delivery
//! is best effort: no retries, no ordering, no acknowledgement. Nothing in the
//! reporting path ever returns an error to, or panics into, the caller.
//!
//! # Quick Start
//!
//! ```ignore
//! use zohan::{Labels, PanicGuard, Reporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = zohan_config::load_config()?;
//!     zohan::logging::init(&config.logging)?;
//!
//!     let reporter = Reporter::new(&config);
//!     if let Err(e) = settle_invoice().await {
//!         reporter.report(&e, Labels::from([("module", "payment")]));
//!     }
//!
//!     // Panics inside the task are reported and stop at the guard.
//!     zohan::spawn_guarded(&config, async {
//!         reconcile_ledger().await;
//!     });
//!
//!     Ok(())
//! }
//! ```

mod dispatch;
mod error;
pub mod http;
pub mod logging;
pub mod output;
mod panic_guard;
mod reporter;
mod sink;

pub use error::{PanicError, SinkError};
pub use output::{DiagnosticOutput, MemoryOutput, StderrOutput, TracingOutput};
pub use panic_guard::{
	capture_panic, coerce_payload, spawn_guarded, spawn_thread_guarded, PanicGuard, OPAQUE_PAYLOAD,
};
pub use reporter::{Reporter, ReporterBuilder};
pub use sink::{NotificationSink, SlackWebhookSink};

// Re-export core types for convenience
pub use zohan_config::ZohanConfig;
pub use zohan_core::{Event, LabelFormat, Labels, SlackMessage, PANIC_LABEL};
