// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Panic recovery boundary.
//!
//! A [`PanicGuard`] wraps a unit of work (closure, future, task or thread).
//! If the work panics, the unwind stops at the guard: the payload becomes an
//! error, a fresh [`Reporter`] reports it with `panic = "true"`, and the guard
//! returns `None` instead of propagating. Normal completion returns
//! `Some(value)` with no other effect.
//!
//! The standard panic hook still runs before the guard sees the unwind, so
//! the usual `thread '...' panicked at` line is printed as well.
//!
//! Use this at supervision boundaries only; ordinary failures belong in
//! `Result`.

use std::any::Any;
use std::error::Error;
use std::future::Future;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use tracing::error;
use zohan_config::ZohanConfig;
use zohan_core::{Labels, PANIC_LABEL};

use crate::error::PanicError;
use crate::output::DiagnosticOutput;
use crate::reporter::ReporterBuilder;
use crate::sink::NotificationSink;

/// Description used when a payload is neither an error nor text.
pub const OPAQUE_PAYLOAD: &str = "Box<dyn Any>";

/// Turn a panic payload into an error.
///
/// Payloads that already are errors are kept as they are, except
/// `Box<dyn Error + Send>` which keeps only its message. `&str` and `String`
/// payloads become a [`PanicError`] with the same text.
pub fn coerce_payload(payload: Box<dyn Any + Send>) -> Box<dyn Error + Send + Sync> {
	let payload = match payload.downcast::<Box<dyn Error + Send + Sync>>() {
		Ok(error) => return *error,
		Err(other) => other,
	};
	let payload = match payload.downcast::<io::Error>() {
		Ok(error) => return error,
		Err(other) => other,
	};
	let payload = match payload.downcast::<PanicError>() {
		Ok(error) => return error,
		Err(other) => other,
	};
	// Not `Sync`, so only the message can be carried over.
	let payload = match payload.downcast::<Box<dyn Error + Send>>() {
		Ok(error) => return Box::new(PanicError(error.to_string())),
		Err(other) => other,
	};

	let text = if let Some(s) = payload.downcast_ref::<&'static str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		OPAQUE_PAYLOAD.to_string()
	};
	Box::new(PanicError(text))
}

/// Scoped recovery helper. See the [module docs](self).
#[derive(Clone)]
pub struct PanicGuard {
	reporter: ReporterBuilder,
	labels: Labels,
}

impl PanicGuard {
	/// Guard that reports through a reporter built from `config`.
	pub fn new(config: &ZohanConfig) -> Self {
		Self::from_builder(ReporterBuilder::new().config(config))
	}

	/// Guard that reports through reporters built from `reporter`.
	pub fn from_builder(reporter: ReporterBuilder) -> Self {
		Self {
			reporter,
			labels: Labels::new(),
		}
	}

	/// Extra labels attached to every recovered panic. `panic` is always
	/// overwritten with `"true"`.
	pub fn labels(mut self, labels: impl Into<Labels>) -> Self {
		self.labels = labels.into();
		self
	}

	pub fn output(mut self, output: Arc<dyn DiagnosticOutput>) -> Self {
		self.reporter = self.reporter.output(output);
		self
	}

	pub fn sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
		self.reporter = self.reporter.sink(sink);
		self
	}

	/// Run `f`, recovering and reporting any panic.
	pub fn run<F, R>(&self, f: F) -> Option<R>
	where
		F: FnOnce() -> R,
	{
		// Whatever `f` touched is discarded on panic, so unwind safety holds.
		match panic::catch_unwind(AssertUnwindSafe(f)) {
			Ok(value) => Some(value),
			Err(payload) => {
				self.recover(payload);
				None
			}
		}
	}

	/// Drive `future` to completion, recovering and reporting any panic
	/// raised while polling it.
	pub async fn run_async<Fut>(&self, future: Fut) -> Option<Fut::Output>
	where
		Fut: Future,
	{
		match AssertUnwindSafe(future).catch_unwind().await {
			Ok(value) => Some(value),
			Err(payload) => {
				self.recover(payload);
				None
			}
		}
	}

	/// Spawn `future` on the current Tokio runtime under this guard.
	///
	/// # Panics
	///
	/// Panics if called outside a Tokio runtime, like `tokio::spawn`.
	pub fn spawn<Fut>(self, future: Fut) -> tokio::task::JoinHandle<Option<Fut::Output>>
	where
		Fut: Future + Send + 'static,
		Fut::Output: Send + 'static,
	{
		tokio::spawn(async move { self.run_async(future).await })
	}

	/// Run `f` on a new OS thread under this guard.
	pub fn spawn_thread<F, R>(self, f: F) -> io::Result<std::thread::JoinHandle<Option<R>>>
	where
		F: FnOnce() -> R + Send + 'static,
		R: Send + 'static,
	{
		std::thread::Builder::new().spawn(move || self.run(f))
	}

	fn recover(&self, payload: Box<dyn Any + Send>) {
		let error = coerce_payload(payload);
		let mut labels = self.labels.clone();
		labels.insert(PANIC_LABEL, "true");

		let reporter = self.reporter.clone().build();
		// A panicking output or sink must not undo the recovery.
		let reported = panic::catch_unwind(AssertUnwindSafe(|| {
			reporter.report(error.as_ref(), labels);
		}));
		if reported.is_err() {
			error!(error = %error, "panic while reporting a recovered panic");
		}
	}
}

/// Run `f` under a [`PanicGuard`] built from `config`.
///
/// ```ignore
/// let config = zohan_config::load_config()?;
/// zohan::capture_panic(&config, || {
///     process_batch();
/// });
/// // still running, even if process_batch panicked
/// ```
pub fn capture_panic<F, R>(config: &ZohanConfig, f: F) -> Option<R>
where
	F: FnOnce() -> R,
{
	PanicGuard::new(config).run(f)
}

/// Spawn a Tokio task whose panics are reported and contained.
pub fn spawn_guarded<Fut>(
	config: &ZohanConfig,
	future: Fut,
) -> tokio::task::JoinHandle<Option<Fut::Output>>
where
	Fut: Future + Send + 'static,
	Fut::Output: Send + 'static,
{
	PanicGuard::new(config).spawn(future)
}

/// Spawn an OS thread whose panics are reported and contained.
pub fn spawn_thread_guarded<F, R>(
	config: &ZohanConfig,
	f: F,
) -> io::Result<std::thread::JoinHandle<Option<R>>>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	PanicGuard::new(config).spawn_thread(f)
}
