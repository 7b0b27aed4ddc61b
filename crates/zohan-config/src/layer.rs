// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{LoggingConfigLayer, NotificationConfigLayer};

/// Partially specified configuration; every field is optional so layers can
/// be stacked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZohanConfigLayer {
	#[serde(default)]
	pub environment: Option<String>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub notification: Option<NotificationConfigLayer>,
}

impl ZohanConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: ZohanConfigLayer) {
		if other.environment.is_some() {
			self.environment = other.environment;
		}
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_option(
			&mut self.notification,
			other.notification,
			NotificationConfigLayer::merge,
		);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}
