//! Unit tests for the task lifecycle state machine and comment model.

use taskscout::models::task::{Comment, TaskStatus};

// ── Status transitions ───────────────────────────────────────

#[test]
fn active_can_close_either_way() {
    assert!(TaskStatus::Active.can_transition_to(TaskStatus::Done));
    assert!(TaskStatus::Active.can_transition_to(TaskStatus::Rejected));
}

#[test]
fn reopen_is_always_legal() {
    assert!(TaskStatus::Done.can_transition_to(TaskStatus::Active));
    assert!(TaskStatus::Rejected.can_transition_to(TaskStatus::Active));
}

#[test]
fn closed_states_cannot_swap_directly() {
    assert!(!TaskStatus::Done.can_transition_to(TaskStatus::Rejected));
    assert!(!TaskStatus::Rejected.can_transition_to(TaskStatus::Done));
}

#[test]
fn self_transition_is_idempotent() {
    for status in [TaskStatus::Active, TaskStatus::Done, TaskStatus::Rejected] {
        assert!(status.can_transition_to(status));
    }
}

// ── Labels and lossy parsing ─────────────────────────────────

#[test]
fn status_labels_round_trip() {
    for status in [TaskStatus::Active, TaskStatus::Done, TaskStatus::Rejected] {
        assert_eq!(TaskStatus::parse_lossy(status.as_str()), status);
    }
}

#[test]
fn unknown_status_defaults_to_active() {
    assert_eq!(TaskStatus::parse_lossy("archived"), TaskStatus::Active);
    assert_eq!(TaskStatus::parse_lossy(""), TaskStatus::Active);
}

#[test]
fn parse_lossy_ignores_case_and_whitespace() {
    assert_eq!(TaskStatus::parse_lossy("  Done "), TaskStatus::Done);
    assert_eq!(TaskStatus::parse_lossy("REJECTED"), TaskStatus::Rejected);
}

#[test]
fn status_serializes_snake_case() {
    let json = serde_json::to_string(&TaskStatus::Rejected).expect("serialize");
    assert_eq!(json, "\"rejected\"");
}

// ── Comments ─────────────────────────────────────────────────

#[test]
fn comment_ids_are_short_and_unique() {
    let a = Comment::new("User".into(), "first".into());
    let b = Comment::new("User".into(), "second".into());
    assert_eq!(a.id.len(), 8);
    assert_ne!(a.id, b.id);
}

#[test]
fn comment_timestamp_has_expected_shape() {
    let c = Comment::new("User".into(), "note".into());
    // YYYY-MM-DD HH:MM:SS
    assert_eq!(c.timestamp.len(), 19);
    assert_eq!(&c.timestamp[4..5], "-");
    assert_eq!(&c.timestamp[10..11], " ");
}
