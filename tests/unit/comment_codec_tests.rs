//! Unit tests for the encoded comment-thread format (schema v1).

use taskscout::models::task::Comment;
use taskscout::store::record::{append_comment_line, parse_comments, remove_comment_line};

fn comment(id: &str, text: &str) -> Comment {
    Comment {
        id: id.into(),
        timestamp: "2026-08-30 10:15:00".into(),
        sender: "Alex".into(),
        text: text.into(),
    }
}

#[test]
fn append_to_empty_thread_has_no_leading_newline() {
    let encoded = append_comment_line("", &comment("abcd1234", "first note"));
    assert_eq!(encoded, "[abcd1234] 2026-08-30 10:15:00 Alex: first note");
}

#[test]
fn append_joins_with_newline() {
    let encoded = append_comment_line("", &comment("aaaa0000", "one"));
    let encoded = append_comment_line(&encoded, &comment("bbbb1111", "two"));
    assert_eq!(encoded.lines().count(), 2);
}

#[test]
fn thread_is_capped_at_2000_chars() {
    let long = "x".repeat(600);
    let mut encoded = String::new();
    for i in 0..6 {
        encoded = append_comment_line(&encoded, &comment(&format!("id{i}"), &long));
    }
    assert!(encoded.chars().count() <= 2000);
}

#[test]
fn parse_returns_newest_first() {
    let encoded = "[aaaa0000] 2026-08-30 09:00:00 Alex: oldest\n\
                   [bbbb1111] 2026-08-30 10:00:00 Kim: newest";
    let comments = parse_comments(encoded);
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "newest");
    assert_eq!(comments[0].sender, "Kim");
    assert_eq!(comments[1].id, "aaaa0000");
}

#[test]
fn parse_preserves_colons_in_text() {
    let encoded = "[aaaa0000] 2026-08-30 09:00:00 Alex: deadline: tomorrow at 17:00";
    let comments = parse_comments(encoded);
    assert_eq!(comments[0].text, "deadline: tomorrow at 17:00");
}

#[test]
fn malformed_lines_become_unknown_comments() {
    let encoded = "just a stray line without metadata";
    let comments = parse_comments(encoded);
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, "unknown");
    assert_eq!(comments[0].text, "just a stray line without metadata");
}

#[test]
fn blank_lines_are_skipped() {
    let encoded = "\n\n[aaaa0000] 2026-08-30 09:00:00 Alex: only one\n\n";
    assert_eq!(parse_comments(encoded).len(), 1);
}

#[test]
fn remove_deletes_only_the_matching_line() {
    let encoded = "[aaaa0000] 2026-08-30 09:00:00 Alex: keep\n\
                   [bbbb1111] 2026-08-30 10:00:00 Kim: drop";
    let remaining = remove_comment_line(encoded, "bbbb1111").expect("line removed");
    assert_eq!(parse_comments(&remaining).len(), 1);
    assert_eq!(parse_comments(&remaining)[0].text, "keep");
}

#[test]
fn remove_unknown_id_returns_none() {
    let encoded = "[aaaa0000] 2026-08-30 09:00:00 Alex: keep";
    assert!(remove_comment_line(encoded, "zzzz9999").is_none());
}
