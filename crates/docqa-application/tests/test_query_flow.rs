mod common;

use common::{Gate, MockBackend, harness};
use docqa_application::{SendOutcome, SendRejection};
use docqa_core::session::{MessageRole, QUERY_FALLBACK_TEXT};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_send_appends_user_then_answer() {
    let h = harness(MockBackend::answering("X", &["c1", "c2"]));

    let outcome = h.controller.send("What is X?").await;
    assert!(matches!(outcome, SendOutcome::Answered(_)));
    assert_eq!(h.backend.query_calls(), 1);

    let state = h.controller.snapshot().await;
    assert_eq!(state.len(), 3);
    assert!(!state.query_pending());

    let user = &state.messages()[1];
    assert_eq!(user.role, MessageRole::User);
    assert_eq!(user.content, "What is X?");

    let answer = &state.messages()[2];
    assert_eq!(answer.role, MessageRole::Assistant);
    assert_eq!(answer.content, "X");
    assert_eq!(
        answer.citations,
        Some(vec!["c1".to_string(), "c2".to_string()])
    );
}

#[tokio::test]
async fn test_send_uses_trimmed_text_and_default_k() {
    let h = harness(MockBackend::answering("ok", &[]));

    h.controller.send("  spaced out question \n").await;

    let queries = h.backend.queries.lock().unwrap().clone();
    assert_eq!(queries, vec![("spaced out question".to_string(), 3)]);

    // The timeline keeps what the user actually typed
    let state = h.controller.snapshot().await;
    assert_eq!(state.messages()[1].content, "  spaced out question \n");
}

#[tokio::test]
async fn test_citations_are_not_reordered_or_deduplicated() {
    let h = harness(MockBackend::answering("A", &["b", "a", "b", ""]));

    let SendOutcome::Answered(message) = h.controller.send("q").await else {
        panic!("expected an answer");
    };
    assert_eq!(
        message.citations,
        Some(vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "".to_string()
        ])
    );
}

#[tokio::test]
async fn test_blank_input_is_rejected_without_call() {
    let h = harness(MockBackend::answering("unused", &[]));

    let outcome = h.controller.send("   ").await;
    assert_eq!(outcome, SendOutcome::Rejected(SendRejection::Empty));
    assert_eq!(h.backend.query_calls(), 0);
    assert_eq!(h.controller.snapshot().await.len(), 1);
}

#[tokio::test]
async fn test_failure_appends_fallback_and_clears_pending() {
    let h = harness(MockBackend::default().failing_queries());

    let outcome = h.controller.send("anything").await;
    let SendOutcome::Failed(message) = outcome else {
        panic!("expected the fallback");
    };
    assert_eq!(message.content, QUERY_FALLBACK_TEXT);
    assert!(message.citations.is_none());

    let state = h.controller.snapshot().await;
    assert!(!state.query_pending());
    assert_eq!(state.len(), 3);
    assert_eq!(state.last().unwrap().content, QUERY_FALLBACK_TEXT);
}

#[tokio::test]
async fn test_malformed_response_uses_fallback() {
    // No answer configured: the mock reports a malformed body
    let h = harness(MockBackend::default());

    let outcome = h.controller.send("anything").await;
    assert!(matches!(outcome, SendOutcome::Failed(_)));
    assert!(!h.controller.is_query_pending().await);
}

#[tokio::test]
async fn test_second_send_refused_while_pending() {
    let gate = Arc::new(Gate::default());
    let h = harness(MockBackend::answering("first answer", &["c"]).with_query_gate(gate.clone()));

    let controller = h.controller.clone();
    let first = tokio::spawn(async move { controller.send("first").await });

    // Wait until the first query is outstanding
    gate.entered.notified().await;
    assert!(h.controller.is_query_pending().await);

    let second = h.controller.send("second").await;
    assert_eq!(second, SendOutcome::Rejected(SendRejection::Pending));
    assert_eq!(h.backend.query_calls(), 1);
    assert_eq!(h.controller.snapshot().await.len(), 2);

    gate.release.notify_one();
    let first = first.await.unwrap();
    assert!(matches!(first, SendOutcome::Answered(_)));

    let state = h.controller.snapshot().await;
    let contents: Vec<&str> = state.messages()[1..]
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(contents, vec!["first", "first answer"]);
    assert!(!state.query_pending());

    // Once settled, sending works again
    gate.release.notify_one();
    assert!(matches!(
        h.controller.send("third").await,
        SendOutcome::Answered(_)
    ));
    assert_eq!(h.backend.query_calls(), 2);
}

#[tokio::test]
async fn test_message_ids_unique() {
    let h = harness(MockBackend::answering("a", &[]));
    for i in 0..5 {
        h.controller.send(&format!("question {i}")).await;
    }

    let state = h.controller.snapshot().await;
    let mut ids: Vec<&str> = state.messages().iter().map(|m| m.id.as_str()).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(total, 11);
}

#[tokio::test]
async fn test_citation_disclosure_toggle() {
    let long = "x".repeat(300);
    let h = harness(MockBackend::answering("A", &["first passage", long.as_str()]));

    let SendOutcome::Answered(message) = h.controller.send("q").await else {
        panic!("expected an answer");
    };

    // Collapsed by default
    assert_eq!(h.controller.visible_citations(&message).await, None);

    assert_eq!(h.controller.toggle_citations(&message.id).await, Some(true));
    let shown = h.controller.visible_citations(&message).await.unwrap();
    assert_eq!(shown[0], "first passage");
    assert_eq!(shown[1], format!("{}...", "x".repeat(200)));

    assert_eq!(h.controller.toggle_citations(&message.id).await, Some(false));
    assert_eq!(h.controller.visible_citations(&message).await, None);

    assert_eq!(h.controller.toggle_citations("no-such-id").await, None);
}

#[tokio::test]
async fn test_new_answers_start_collapsed() {
    let h = harness(MockBackend::answering("A", &["c"]));

    let SendOutcome::Answered(first) = h.controller.send("one").await else {
        panic!("expected an answer");
    };
    h.controller.toggle_citations(&first.id).await;

    let SendOutcome::Answered(second) = h.controller.send("two").await else {
        panic!("expected an answer");
    };
    assert!(h.controller.visible_citations(&first).await.is_some());
    assert!(h.controller.visible_citations(&second).await.is_none());
}

#[tokio::test]
async fn test_cancelled_send_does_not_leave_session_pending() {
    let gate = Arc::new(Gate::default());
    let h = harness(MockBackend::answering("A", &["c"]).with_query_gate(gate.clone()));

    let timed_out = tokio::time::timeout(Duration::from_millis(50), h.controller.send("q")).await;
    assert!(timed_out.is_err());

    let state = h.controller.snapshot().await;
    assert!(!state.query_pending());
    assert_eq!(state.len(), 3);
    assert_eq!(state.last().unwrap().content, QUERY_FALLBACK_TEXT);

    gate.release.notify_one();
    assert!(matches!(
        h.controller.send("again").await,
        SendOutcome::Answered(_)
    ));
    assert_eq!(h.controller.snapshot().await.len(), 5);
}

#[tokio::test]
async fn test_aborted_send_task_releases_pending() {
    let gate = Arc::new(Gate::default());
    let h = harness(MockBackend::answering("A", &[]).with_query_gate(gate.clone()));

    let controller = h.controller.clone();
    let task = tokio::spawn(async move { controller.send("q").await });
    gate.entered.notified().await;
    assert!(h.controller.is_query_pending().await);

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert!(!h.controller.is_query_pending().await);
    assert_eq!(
        h.controller.snapshot().await.last().unwrap().content,
        QUERY_FALLBACK_TEXT
    );
}
