// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fire-and-forget hand-off of events to a sink.
//!
//! Delivery runs on the ambient Tokio runtime when there is one, otherwise on
//! a detached thread driving its own single-threaded runtime. Nothing is
//! joined, ordered, retried or bounded: a failed or panicking delivery is
//! logged and the event is gone.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::{Builder, Handle};
use tracing::{debug, error, warn};
use zohan_core::Event;

use crate::sink::NotificationSink;

const NOTIFY_THREAD_NAME: &str = "zohan-notify";

/// Schedule delivery of `event` and return immediately.
pub(crate) fn dispatch(sink: Arc<dyn NotificationSink>, event: Event) {
	match Handle::try_current() {
		Ok(handle) => {
			debug!(sink = sink.name(), "dispatching notification on current runtime");
			drop(handle.spawn(deliver(sink, event)));
		}
		Err(_) => spawn_notify_thread(sink, event),
	}
}

fn spawn_notify_thread(sink: Arc<dyn NotificationSink>, event: Event) {
	debug!(sink = sink.name(), "dispatching notification on background thread");
	let spawned = std::thread::Builder::new()
		.name(NOTIFY_THREAD_NAME.to_string())
		.spawn(move || match Builder::new_current_thread().enable_all().build() {
			Ok(runtime) => {
				runtime.block_on(deliver(sink, event));
			}
			Err(e) => error!(error = %e, "failed to start runtime for notification, dropping event"),
		});

	if let Err(e) = spawned {
		error!(error = %e, "failed to spawn notification thread, dropping event");
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
	Delivered,
	Failed,
	/// The sink panicked, e.g. a host runtime built without timers.
	Panicked,
}

async fn deliver(sink: Arc<dyn NotificationSink>, event: Event) -> Delivery {
	match AssertUnwindSafe(sink.deliver(&event)).catch_unwind().await {
		Ok(Ok(())) => {
			debug!(sink = sink.name(), "notification delivered");
			Delivery::Delivered
		}
		Ok(Err(e)) => {
			warn!(
				sink = sink.name(),
				error = %e,
				message = %event.message(),
				"failed to deliver error notification"
			);
			Delivery::Failed
		}
		Err(_) => {
			error!(
				sink = sink.name(),
				message = %event.message(),
				"notification sink panicked, dropping event"
			);
			Delivery::Panicked
		}
	}
}
