//! Unit tests for the relevance filter and length guard.
//!
//! Rules are evaluated in order with first match winning; events that
//! match no rule must be dropped before any oracle call.

use chrono::Utc;

use taskscout::models::event::ChatEvent;
use taskscout::relevance::{is_relevant, passes_length_guard, KeywordSet};

fn keywords() -> KeywordSet {
    KeywordSet::new(
        "self-channel".into(),
        vec!["Alex".into(), "Carter".into(), "alexc".into(), "invoice".into()],
    )
}

fn event(chat_id: &str, text: &str) -> ChatEvent {
    ChatEvent {
        id: 1,
        chat_id: chat_id.into(),
        sender_name: "Someone".into(),
        text: text.into(),
        is_self: false,
        is_mention: false,
        is_reply_to_self: false,
        is_direct: false,
        link: None,
        timestamp: Utc::now(),
    }
}

// ── Length guard ─────────────────────────────────────────────

#[test]
fn empty_text_fails_length_guard() {
    assert!(!passes_length_guard(&event("g1", "")));
}

#[test]
fn single_char_fails_length_guard() {
    assert!(!passes_length_guard(&event("g1", "k")));
}

#[test]
fn two_chars_pass_length_guard() {
    // "hi" is exactly at the boundary and must reach the filter.
    assert!(passes_length_guard(&event("g1", "hi")));
}

// ── Rule 1: self channel ─────────────────────────────────────

#[test]
fn self_channel_is_relevant() {
    let e = event("self-channel", "note to self");
    assert!(is_relevant(&e, &keywords()));
}

// ── Rule 2: direct message not authored by the owner ─────────

#[test]
fn incoming_direct_message_is_relevant() {
    let mut e = event("dm-42", "lunch tomorrow?");
    e.is_direct = true;
    assert!(is_relevant(&e, &keywords()));
}

#[test]
fn own_direct_message_is_not_relevant_by_dm_rule() {
    let mut e = event("dm-42", "reminder for them");
    e.is_direct = true;
    e.is_self = true;
    assert!(!is_relevant(&e, &keywords()));
}

// ── Rule 3 and 4: mentions and replies ───────────────────────

#[test]
fn mention_is_relevant() {
    let mut e = event("group-1", "someone should look at this");
    e.is_mention = true;
    assert!(is_relevant(&e, &keywords()));
}

#[test]
fn reply_to_owner_is_relevant() {
    let mut e = event("group-1", "sounds good");
    e.is_reply_to_self = true;
    assert!(is_relevant(&e, &keywords()));
}

// ── Rule 5: keywords ─────────────────────────────────────────

#[test]
fn keyword_match_is_case_insensitive_substring() {
    let e = event("group-1", "Please send the INVOICE by Friday");
    assert!(is_relevant(&e, &keywords()));
}

#[test]
fn owner_name_in_text_is_relevant() {
    let e = event("group-1", "ask alex about the deploy");
    assert!(is_relevant(&e, &keywords()));
}

#[test]
fn no_rule_match_is_not_relevant() {
    let e = event("group-1", "completely unrelated chatter");
    assert!(!is_relevant(&e, &keywords()));
}

// ── Keyword set construction ─────────────────────────────────

#[test]
fn empty_keywords_are_skipped() {
    // An empty keyword would substring-match everything.
    let set = KeywordSet::new("self".into(), vec![String::new()]);
    let e = event("group-1", "anything at all");
    assert!(!is_relevant(&e, &set));
}

#[test]
fn keyword_set_from_config_includes_identity_fields() {
    let config = taskscout::GlobalConfig::from_toml_str(
        r#"
keywords = ["urgent"]

[owner]
first_name = "Alex"
last_name = "Carter"
handle = "alexc"
saved_channel_id = "me"
"#,
    )
    .expect("valid config");
    let set = KeywordSet::from_config(&config);
    assert!(set.matches("ping @ALEXC when ready"));
    assert!(set.matches("this is URGENT"));
    assert!(!set.matches("nothing interesting"));
}
