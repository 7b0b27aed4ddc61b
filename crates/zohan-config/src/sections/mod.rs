// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

pub mod logging;
pub mod notification;

pub use logging::{LoggingConfig, LoggingConfigLayer, DEFAULT_LOG_LEVEL};
pub use notification::{
	NotificationConfig, NotificationConfigLayer, DEFAULT_REQUEST_TIMEOUT_SECS,
};
