//! Relevance filter: decides whether an inbound event is worth analyzing.
//!
//! A pure predicate over the event and a keyword/identity set assembled
//! once at startup. Rules are evaluated in order and the first match
//! wins; events matching no rule are dropped before any oracle call.

use tracing::debug;

use crate::config::GlobalConfig;
use crate::models::event::ChatEvent;

/// Minimum text length accepted by the fast-path noise guard.
const MIN_TEXT_LEN: usize = 2;

/// Read-mostly identity and keyword set consulted by the relevance filter.
///
/// Assembled once from configuration plus the owner's identity fields;
/// immutable afterward, so concurrent reads need no synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    /// Conversation identity of the owner's saved/self channel.
    pub self_channel_id: String,
    /// Lowercased substrings that mark an event as relevant.
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Assemble the keyword set from config and owner identity fields.
    ///
    /// Empty identity fields are skipped so a partially configured owner
    /// does not produce match-everything empty keywords.
    #[must_use]
    pub fn from_config(config: &GlobalConfig) -> Self {
        let mut keywords: Vec<String> = Vec::new();
        for field in [
            &config.owner.first_name,
            &config.owner.last_name,
            &config.owner.handle,
        ] {
            if !field.is_empty() {
                keywords.push(field.to_lowercase());
            }
        }
        for kw in &config.keywords {
            if !kw.is_empty() {
                keywords.push(kw.to_lowercase());
            }
        }
        Self {
            self_channel_id: config.owner.saved_channel_id.clone(),
            keywords,
        }
    }

    /// Build a keyword set directly, lowercasing every entry.
    #[must_use]
    pub fn new(self_channel_id: String, keywords: Vec<String>) -> Self {
        Self {
            self_channel_id,
            keywords: keywords
                .into_iter()
                .filter(|k| !k.is_empty())
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// Whether `text` contains any keyword, case-insensitively.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }
}

/// Fast-path noise rejection: drop empty or near-empty messages.
///
/// Runs before the relevance rules and is independent of relevance
/// semantics.
#[must_use]
pub fn passes_length_guard(event: &ChatEvent) -> bool {
    event.text.len() >= MIN_TEXT_LEN
}

/// Decide whether an event is worth analyzing.
///
/// Rules, in order, first match wins:
/// 1. the event's chat is the owner's saved/self channel;
/// 2. a direct message not authored by the owner;
/// 3. the event mentions the owner;
/// 4. the event replies to a message authored by the owner;
/// 5. the text contains a configured or identity keyword.
#[must_use]
pub fn is_relevant(event: &ChatEvent, keywords: &KeywordSet) -> bool {
    if event.chat_id == keywords.self_channel_id {
        debug!(chat_id = %event.chat_id, "relevant: self channel");
        return true;
    }
    if event.is_direct && !event.is_self {
        debug!(chat_id = %event.chat_id, "relevant: direct message");
        return true;
    }
    if event.is_mention {
        debug!(chat_id = %event.chat_id, "relevant: mention");
        return true;
    }
    if event.is_reply_to_self {
        debug!(chat_id = %event.chat_id, "relevant: reply to owner");
        return true;
    }
    if keywords.matches(&event.text) {
        debug!(chat_id = %event.chat_id, "relevant: keyword match");
        return true;
    }
    false
}
