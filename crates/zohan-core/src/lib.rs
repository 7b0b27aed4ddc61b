// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the zohan error reporter.
//!
//! - [`Event`]: the immutable record built for every captured error or panic
//! - [`Labels`]: caller supplied context, rendered as `key: value` pairs
//! - [`SlackMessage`]: the Block Kit payload posted to the chat webhook
//!
//! Nothing in this crate performs I/O.

pub mod event;
pub mod labels;
pub mod message;

pub use event::Event;
pub use labels::{LabelFormat, Labels, NO_LABELS};
pub use message::{Block, SlackMessage, TextObject};

/// Label key the panic guard attaches to every recovered panic.
pub const PANIC_LABEL: &str = "panic";
