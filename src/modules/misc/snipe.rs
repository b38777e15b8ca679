use dashmap::DashMap;
use poise::serenity_prelude::{ChannelId, Mentionable, UserId};
use std::collections::VecDeque;

use crate::utils::{escape_code_fence, escape_markdown, truncate_chars};

/// Number of deleted messages kept per channel.
pub const SNIPE_CAPACITY: usize = 5;

/// Discord's limit on the length of an embed field value.
const FIELD_VALUE_LIMIT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedMessage {
    pub author_id: UserId,
    /// Plain name of the author at the time of deletion.
    pub author_display: String,
    pub content: String,
    /// Unix timestamp (seconds) of when the deletion was seen.
    pub deleted_at: i64,
}

/// Per-channel log of the most recently deleted messages, newest first.
#[derive(Debug, Default)]
pub struct SnipeBuffer {
    channels: DashMap<ChannelId, VecDeque<DeletedMessage>>,
}

impl SnipeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_deletion(&self, channel_id: ChannelId, record: DeletedMessage) {
        // The entry guard holds the shard lock until the trim is done.
        let mut history = self.channels.entry(channel_id).or_default();
        history.push_front(record);
        history.truncate(SNIPE_CAPACITY);
    }

    /// Returns a copy of the channel's history, empty if nothing was deleted there.
    pub fn get_history(&self, channel_id: ChannelId) -> Vec<DeletedMessage> {
        self.channels
            .get(&channel_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Builds the `(name, value)` embed fields for a history, oldest first so the
/// latest deletion ends up at the bottom of the embed.
pub fn render_fields(history: &[DeletedMessage]) -> Vec<(String, String)> {
    history
        .iter()
        .enumerate()
        .rev()
        .map(|(index, message)| {
            let name = if index == 0 {
                format!("{index} (latest)")
            } else {
                index.to_string()
            };
            (name, render_value(message))
        })
        .collect()
}

fn render_value(message: &DeletedMessage) -> String {
    let header = format!(
        "Author: {} (ID: {}, Plain: {})\nDeleted at: <t:{ts}:F> (Relative: <t:{ts}:R>)\nContent:\n```\n",
        message.author_id.mention(),
        message.author_id,
        escape_markdown(&message.author_display),
        ts = message.deleted_at,
    );
    let footer = "\n```";

    let room = FIELD_VALUE_LIMIT.saturating_sub(header.chars().count() + footer.len());
    let content = truncate_chars(&escape_code_fence(&message.content), room);

    format!("{header}{content}{footer}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deleted(n: i64) -> DeletedMessage {
        DeletedMessage {
            author_id: UserId::new(1000 + n as u64),
            author_display: format!("user{n}"),
            content: format!("message {n}"),
            deleted_at: 100 + n,
        }
    }

    fn timestamps(history: &[DeletedMessage]) -> Vec<i64> {
        history.iter().map(|m| m.deleted_at).collect()
    }

    #[test]
    fn test_length_is_capped() {
        let buffer = SnipeBuffer::new();
        let channel = ChannelId::new(1);

        for n in 0..12 {
            buffer.record_deletion(channel, deleted(n));
            let expected = SNIPE_CAPACITY.min(n as usize + 1);
            assert_eq!(buffer.get_history(channel).len(), expected);
        }
    }

    #[test]
    fn test_newest_first() {
        let buffer = SnipeBuffer::new();
        let channel = ChannelId::new(1);

        for n in 0..4 {
            buffer.record_deletion(channel, deleted(n));
            assert_eq!(buffer.get_history(channel)[0], deleted(n));
        }
        assert_eq!(timestamps(&buffer.get_history(channel)), vec![103, 102, 101, 100]);
    }

    #[test]
    fn test_full_history_evicts_oldest() {
        let buffer = SnipeBuffer::new();
        let channel = ChannelId::new(1);

        for n in 0..5 {
            buffer.record_deletion(channel, deleted(n));
        }
        let before = buffer.get_history(channel);

        buffer.record_deletion(channel, deleted(5));
        let after = buffer.get_history(channel);

        assert_eq!(after[0], deleted(5));
        assert_eq!(&after[1..], &before[..4]);
        assert!(!after.contains(&deleted(0)));
    }

    #[test]
    fn test_unknown_channel_is_empty() {
        let buffer = SnipeBuffer::new();
        buffer.record_deletion(ChannelId::new(1), deleted(0));

        assert!(buffer.get_history(ChannelId::new(2)).is_empty());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let buffer = SnipeBuffer::new();
        let channel = ChannelId::new(1);
        buffer.record_deletion(channel, deleted(0));

        let snapshot = buffer.get_history(channel);
        buffer.record_deletion(channel, deleted(1));

        assert_eq!(snapshot, vec![deleted(0)]);
    }

    #[test]
    fn test_channels_are_independent() {
        let buffer = SnipeBuffer::new();
        let a = ChannelId::new(1);
        let b = ChannelId::new(2);

        buffer.record_deletion(b, deleted(9));
        for n in 0..7 {
            buffer.record_deletion(a, deleted(n));
        }

        assert_eq!(buffer.get_history(b), vec![deleted(9)]);
    }

    #[test]
    fn test_eviction_scenario() {
        let buffer = SnipeBuffer::new();
        let c1 = ChannelId::new(1);

        for n in 0..5 {
            buffer.record_deletion(c1, deleted(n));
        }
        assert_eq!(timestamps(&buffer.get_history(c1)), vec![104, 103, 102, 101, 100]);

        buffer.record_deletion(c1, deleted(5));
        assert_eq!(timestamps(&buffer.get_history(c1)), vec![105, 104, 103, 102, 101]);

        assert_eq!(buffer.get_history(ChannelId::new(2)), Vec::<DeletedMessage>::new());
    }

    #[test]
    fn test_concurrent_recording_stays_bounded() {
        let buffer = std::sync::Arc::new(SnipeBuffer::new());
        let channel = ChannelId::new(1);

        let threads: Vec<_> = (0..8)
            .map(|t| {
                let buffer = buffer.clone();
                std::thread::spawn(move || {
                    for n in 0..50 {
                        buffer.record_deletion(channel, deleted(t * 100 + n));
                        assert!(buffer.get_history(channel).len() <= SNIPE_CAPACITY);
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        assert_eq!(buffer.get_history(channel).len(), SNIPE_CAPACITY);
    }

    #[test]
    fn test_render_fields_order_and_names() {
        let history = vec![deleted(2), deleted(1), deleted(0)];
        let fields = render_fields(&history);

        let names: Vec<_> = fields.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["2", "1", "0 (latest)"]);
        assert!(fields[2].1.contains("message 2"));
    }

    #[test]
    fn test_render_value_contents() {
        let message = DeletedMessage {
            author_id: UserId::new(42),
            author_display: "some_user".to_string(),
            content: "```rust\nfn main() {}\n```".to_string(),
            deleted_at: 1_700_000_000,
        };
        let value = render_value(&message);

        assert!(value.starts_with("Author: <@42> (ID: 42, Plain: some\\_user)"));
        assert!(value.contains("<t:1700000000:F> (Relative: <t:1700000000:R>)"));
        // Only the two fences added around the content remain intact.
        assert_eq!(value.matches("```").count(), 2);
    }

    #[test]
    fn test_render_value_empty_content() {
        let message = DeletedMessage {
            author_id: UserId::new(7),
            author_display: "someone".to_string(),
            content: String::new(),
            deleted_at: 5,
        };

        assert!(render_value(&message).ends_with("Content:\n```\n\n```"));
    }

    #[test]
    fn test_render_value_fits_in_field() {
        let message = DeletedMessage {
            author_id: UserId::new(7),
            author_display: "someone".to_string(),
            content: "`a".repeat(2000),
            deleted_at: 5,
        };
        let value = render_value(&message);

        assert!(value.chars().count() <= FIELD_VALUE_LIMIT);
        assert!(value.ends_with("\n```"));
    }
}
