// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Block Kit message posted to an incoming chat webhook.
//!
//! Three section blocks, in order: a header with the timestamp, a two-field
//! table with the message and labels, and the stack trace as a code block.

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::labels::LabelFormat;

/// Top-level webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackMessage {
	pub blocks: Vec<Block>,
}

/// A layout block. Only `section` blocks are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
	Section {
		#[serde(skip_serializing_if = "Option::is_none")]
		text: Option<TextObject>,
		#[serde(skip_serializing_if = "Option::is_none")]
		fields: Option<Vec<TextObject>>,
	},
}

impl Block {
	pub fn text(text: TextObject) -> Self {
		Block::Section {
			text: Some(text),
			fields: None,
		}
	}

	pub fn fields(fields: Vec<TextObject>) -> Self {
		Block::Section {
			text: None,
			fields: Some(fields),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum TextObject {
	Mrkdwn(String),
}

impl TextObject {
	pub fn as_str(&self) -> &str {
		match self {
			TextObject::Mrkdwn(text) => text,
		}
	}
}

impl SlackMessage {
	pub fn from_event(event: &Event) -> Self {
		let timestamp = event.formatted_timestamp();
		Self {
			blocks: vec![
				Block::text(TextObject::Mrkdwn(format!(
					"*Error Reported at {timestamp}*"
				))),
				Block::fields(vec![
					TextObject::Mrkdwn(format!("*Message:*\n{}", event.message())),
					TextObject::Mrkdwn(format!(
						"*Labels:*\n{}",
						event.labels().render(LabelFormat::Mrkdwn)
					)),
				]),
				Block::text(TextObject::Mrkdwn(format!(
					"*Stack Trace:*\n```{}```",
					event.stack_trace()
				))),
			],
		}
	}
}

impl From<&Event> for SlackMessage {
	fn from(event: &Event) -> Self {
		Self::from_event(event)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::labels::Labels;
	use serde_json::json;

	fn sample_event() -> Event {
		Event::from_message("db timeout", Labels::from([("module", "payment")]))
	}

	#[test]
	fn test_three_blocks_in_order() {
		let event = sample_event();
		let message = SlackMessage::from_event(&event);
		assert_eq!(message.blocks.len(), 3);

		match &message.blocks[0] {
			Block::Section {
				text: Some(text),
				fields: None,
			} => assert_eq!(
				text.as_str(),
				format!("*Error Reported at {}*", event.formatted_timestamp())
			),
			other => panic!("unexpected header block: {other:?}"),
		}

		match &message.blocks[1] {
			Block::Section {
				text: None,
				fields: Some(fields),
			} => {
				assert_eq!(fields[0].as_str(), "*Message:*\ndb timeout");
				assert_eq!(fields[1].as_str(), "*Labels:*\n*module:* payment\n");
			}
			other => panic!("unexpected field block: {other:?}"),
		}

		match &message.blocks[2] {
			Block::Section {
				text: Some(text), ..
			} => {
				assert!(text.as_str().starts_with("*Stack Trace:*\n```"));
				assert!(text.as_str().ends_with("```"));
				assert!(text.as_str().contains(event.stack_trace()));
			}
			other => panic!("unexpected trace block: {other:?}"),
		}
	}

	#[test]
	fn test_empty_labels_use_sentinel() {
		let event = Event::from_message("x", Labels::new());
		let message = SlackMessage::from(&event);
		let json = serde_json::to_value(&message).unwrap();
		assert_eq!(json["blocks"][1]["fields"][1]["text"], "*Labels:*\nNone");
	}

	#[test]
	fn test_wire_shape() {
		let event = sample_event();
		let json = serde_json::to_value(SlackMessage::from_event(&event)).unwrap();

		assert_eq!(
			json["blocks"][0],
			json!({
				"type": "section",
				"text": {
					"type": "mrkdwn",
					"text": format!("*Error Reported at {}*", event.formatted_timestamp()),
				}
			})
		);
		assert_eq!(json["blocks"][1]["type"], "section");
		assert!(json["blocks"][1].get("text").is_none());
		assert_eq!(json["blocks"][1]["fields"][0]["type"], "mrkdwn");
	}
}
