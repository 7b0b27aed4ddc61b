// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Context labels attached to reported events.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Rendered in place of an empty label set.
pub const NO_LABELS: &str = "None";

/// How [`Labels::render`] lays out the pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFormat {
	/// `key: value, key: value` on one line, for the diagnostic record.
	Plain,
	/// One `*key:* value` line per pair, for chat markup.
	Mrkdwn,
}

/// String key/value context for an event.
///
/// Keys are unique. Ordering is by key so renderings are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a label, replacing any previous value for `key`.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(key.into(), value.into())
	}

	/// Builder-style [`Labels::insert`].
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(key, value);
		self
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Copy every label from `other` into `self`; `other` wins on conflicts.
	pub fn extend_from(&mut self, other: &Labels) {
		for (k, v) in other.iter() {
			self.insert(k, v);
		}
	}

	pub fn render(&self, format: LabelFormat) -> String {
		if self.is_empty() {
			return NO_LABELS.to_string();
		}

		let mut out = String::new();
		for (i, (key, value)) in self.iter().enumerate() {
			// Writing into a String cannot fail.
			let _ = match format {
				LabelFormat::Plain if i == 0 => write!(out, "{key}: {value}"),
				LabelFormat::Plain => write!(out, ", {key}: {value}"),
				LabelFormat::Mrkdwn => writeln!(out, "*{key}:* {value}"),
			};
		}
		out
	}
}

impl<K, V> FromIterator<(K, V)> for Labels
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}
}

impl<K, V, const N: usize> From<[(K, V); N]> for Labels
where
	K: Into<String>,
	V: Into<String>,
{
	fn from(pairs: [(K, V); N]) -> Self {
		pairs.into_iter().collect()
	}
}

impl From<HashMap<String, String>> for Labels {
	fn from(map: HashMap<String, String>) -> Self {
		map.into_iter().collect()
	}
}

impl From<BTreeMap<String, String>> for Labels {
	fn from(map: BTreeMap<String, String>) -> Self {
		Self(map)
	}
}
