//! End-to-end triage flows through the assembled pipeline.
//!
//! Exercises the relevance gate, the oracle decision gate, dedup
//! against the store, audit recording, and owner notification.

use taskscout::audit::AuditSink;
use taskscout::models::task::TaskStatus;
use taskscout::triage::{dedup_key, SkipReason, TriageOutcome};

use super::test_helpers::{direct_event, eval, group_event, test_pipeline, ScriptedOracle};

#[tokio::test]
async fn urgent_direct_message_creates_task() {
    let mut evaluation = eval(7, "Ship the release", true);
    evaluation.deadline = Some("Friday".to_owned());
    let t = test_pipeline(ScriptedOracle::scoring(evaluation)).await;

    let event = direct_event(1, "can you ship the release by Friday?");
    let outcome = t.pipeline.handle_event(event.clone()).await;

    let Some(TriageOutcome::Created(task)) = outcome else {
        panic!("expected Created, got {outcome:?}");
    };
    assert_eq!(task.priority, 7);
    assert_eq!(task.summary, "Ship the release");
    assert_eq!(task.status, TaskStatus::Active);
    assert_eq!(task.deadline.as_deref(), Some("Friday"));
    assert_eq!(task.link.as_deref(), event.link.as_deref());

    let stored = t.store.get(&task.id).await.expect("get").expect("task");
    assert_eq!(stored.summary, "Ship the release");
    assert_eq!(stored.deadline.as_deref(), Some("Friday"));
}

#[tokio::test]
async fn created_task_notifies_owner() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(8, "Call the vendor", true))).await;

    t.pipeline
        .handle_event(direct_event(2, "please call the vendor"))
        .await;

    let messages = t.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Task added"));
    assert!(messages[0].contains("Priority: 8"));
    assert!(messages[0].contains("Call the vendor"));
}

#[tokio::test]
async fn same_event_twice_is_a_duplicate() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(6, "Review the doc", true))).await;
    let event = direct_event(3, "review the doc when you can");

    let first = t.pipeline.handle_event(event.clone()).await;
    let Some(TriageOutcome::Created(task)) = first else {
        panic!("expected Created, got {first:?}");
    };

    let second = t.pipeline.handle_event(event).await;
    assert_eq!(second, Some(TriageOutcome::Duplicate(task.id)));

    let all = t.store.list_all().await.expect("list");
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn linkless_event_dedups_on_synthesized_key() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(9, "Server is down", true))).await;
    let mut event = direct_event(4, "the server is down!");
    event.link = None;
    assert_eq!(dedup_key(&event), "chat/dm-alice/4");

    let first = t.pipeline.handle_event(event.clone()).await;
    assert!(matches!(first, Some(TriageOutcome::Created(_))));

    let second = t.pipeline.handle_event(event).await;
    assert!(matches!(second, Some(TriageOutcome::Duplicate(_))));
}

#[tokio::test]
async fn low_score_without_action_is_skipped() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(2, "Small talk", false))).await;

    let outcome = t
        .pipeline
        .handle_event(direct_event(5, "how was your weekend?"))
        .await;

    assert_eq!(
        outcome,
        Some(TriageOutcome::Skipped(SkipReason::BelowThreshold))
    );
    assert!(t.store.list_all().await.expect("list").is_empty());
    assert!(t.notifier.messages().is_empty());
}

#[tokio::test]
async fn action_required_bypasses_the_threshold() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(1, "RSVP needed", true))).await;

    let outcome = t
        .pipeline
        .handle_event(direct_event(6, "are you coming tonight? need an answer"))
        .await;

    assert!(matches!(outcome, Some(TriageOutcome::Created(_))));
}

#[tokio::test]
async fn oracle_failure_degrades_to_a_skip() {
    let t = test_pipeline(ScriptedOracle::failing()).await;

    let outcome = t
        .pipeline
        .handle_event(direct_event(7, "urgent: everything broke"))
        .await;

    assert_eq!(
        outcome,
        Some(TriageOutcome::Skipped(SkipReason::BelowThreshold))
    );

    // The neutral substitute still lands in the audit trail.
    let entries = t.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].evaluation.summary, "Analysis failed");
    assert_eq!(entries[0].evaluation.priority, 0);
}

#[tokio::test]
async fn skipped_events_are_still_audited() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(1, "Chit chat", false))).await;

    t.pipeline
        .handle_event(direct_event(8, "nice weather today"))
        .await;

    let entries = t.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].sender, "Alice");
    assert_eq!(entries[0].raw_text, "nice weather today");
}

#[tokio::test]
async fn irrelevant_event_never_reaches_the_oracle() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(9, "Should not run", true))).await;

    let outcome = t
        .pipeline
        .handle_event(group_event(9, "lunch plans anyone?"))
        .await;

    assert_eq!(outcome, None);
    assert_eq!(t.oracle.evaluate_calls(), 0);
    assert!(t.audit.entries().is_empty());
    assert!(t.store.list_all().await.expect("list").is_empty());
}

#[tokio::test]
async fn near_empty_text_is_dropped_by_the_length_guard() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(9, "Should not run", true))).await;

    let outcome = t.pipeline.handle_event(direct_event(10, "k")).await;

    assert_eq!(outcome, None);
    assert_eq!(t.oracle.evaluate_calls(), 0);
}

#[tokio::test]
async fn keyword_match_makes_a_group_event_relevant() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(5, "Deploy tonight", true))).await;

    let outcome = t
        .pipeline
        .handle_event(group_event(11, "we should deploy tonight"))
        .await;

    assert!(matches!(outcome, Some(TriageOutcome::Created(_))));
    assert_eq!(t.oracle.evaluate_calls(), 1);
}

#[tokio::test]
async fn relevant_group_event_feeds_the_discussion_buffer() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(0, "Noise", false))).await;

    let mut event = group_event(12, "status update on the migration");
    event.is_mention = true;
    t.pipeline.handle_event(event).await;

    // Buffered even though triage skipped it.
    assert_eq!(t.buffer.len().await, 1);
    let points = t.buffer.snapshot().await;
    assert_eq!(points[0].group, "Project Group");
    assert_eq!(points[0].sender, "Bob");
}

#[tokio::test]
async fn direct_messages_do_not_feed_the_discussion_buffer() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(0, "Noise", false))).await;

    t.pipeline
        .handle_event(direct_event(13, "just between us"))
        .await;

    assert!(t.buffer.is_empty().await);
}

#[tokio::test]
async fn out_of_range_oracle_score_is_clamped() {
    let t = test_pipeline(ScriptedOracle::scoring(eval(200, "Way too hot", true))).await;

    let outcome = t
        .pipeline
        .handle_event(direct_event(14, "clamp me please"))
        .await;

    let Some(TriageOutcome::Created(task)) = outcome else {
        panic!("expected Created, got {outcome:?}");
    };
    assert_eq!(task.priority, 10);
}
