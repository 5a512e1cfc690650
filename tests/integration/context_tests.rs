//! Context builder: conversation window fallback and memory digest.

use std::sync::Arc;

use taskscout::config::TriageConfig;
use taskscout::context::ContextBuilder;
use taskscout::models::task::{NewTask, TaskStatus};
use taskscout::store::TaskStore;
use taskscout::transport::NullTransport;

use super::test_helpers::{direct_event, memory_store};

fn builder(store: TaskStore) -> ContextBuilder {
    ContextBuilder::new(Arc::new(NullTransport), store, &TriageConfig::default())
}

async fn seed(store: &TaskStore, summary: &str, status: TaskStatus) -> String {
    let task = store
        .create(NewTask {
            summary: summary.to_owned(),
            priority: 5,
            sender: "Alice".to_owned(),
            link: None,
            deadline: None,
        })
        .await
        .expect("create");
    store.set_status(&task.id, status).await.expect("status");
    task.id
}

#[tokio::test]
async fn history_failure_falls_back_to_the_triggering_line() {
    let store = memory_store().await;
    let event = direct_event(1, "can you review this?");

    let context = builder(store).build(&event).await;

    assert_eq!(context.conversation, "Alice: can you review this?");
}

#[tokio::test]
async fn empty_store_yields_an_empty_digest() {
    let store = memory_store().await;

    let digest = builder(store).memory_digest().await;

    assert!(digest.is_empty());
}

#[tokio::test]
async fn digest_sections_reflect_task_outcomes() {
    let store = memory_store().await;
    seed(&store, "shipped the release", TaskStatus::Done).await;
    seed(&store, "ignored the newsletter", TaskStatus::Rejected).await;

    let digest = builder(store).memory_digest().await;

    assert!(digest.contains("Recently completed tasks:"));
    assert!(digest.contains("- shipped the release"));
    assert!(digest.contains("Examples of tasks I accepted and completed:"));
    assert!(digest.contains("- [Alice] shipped the release"));
    assert!(digest.contains("Examples of tasks I rejected as not worth doing:"));
    assert!(digest.contains("- [Alice] ignored the newsletter"));
}

#[tokio::test]
async fn digest_examples_carry_comment_notes() {
    let store = memory_store().await;
    let id = seed(&store, "declined the meeting", TaskStatus::Rejected).await;
    store
        .add_comment(&id, "too early in the morning".to_owned(), "User".to_owned())
        .await
        .expect("add")
        .expect("created");

    let digest = builder(store).memory_digest().await;

    assert!(digest.contains("declined the meeting (notes: too early in the morning)"));
}

#[tokio::test]
async fn digest_omits_sections_without_examples() {
    let store = memory_store().await;
    seed(&store, "only a rejection", TaskStatus::Rejected).await;

    let digest = builder(store).memory_digest().await;

    assert!(!digest.contains("Recently completed tasks:"));
    assert!(digest.contains("Examples of tasks I rejected as not worth doing:"));
}
