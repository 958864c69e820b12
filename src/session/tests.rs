use super::*;

#[tokio::test]
async fn creation_is_idempotent_per_id() {
    let store = SessionStore::new();

    let first = store.get_or_create("alice").await;
    let second = store.get_or_create("alice").await;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn sessions_are_isolated() {
    let store = SessionStore::new();

    {
        let session = store.get_or_create("alice").await;
        let mut guard = session.lock().await;
        guard.push_turn(Role::User, "show me shirts");
        guard.push_turn(Role::Assistant, "here are some shirts");
    }
    {
        let session = store.get_or_create("bob").await;
        let mut guard = session.lock().await;
        guard.push_turn(Role::User, "show me watches");
    }

    let alice = store.history_snapshot("alice").await.expect("alice exists");
    let bob = store.history_snapshot("bob").await.expect("bob exists");

    assert_eq!(alice.len(), 2);
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].text, "show me watches");
    assert!(alice.iter().all(|turn| turn.text != "show me watches"));
}

#[tokio::test]
async fn history_snapshot_of_unknown_session_is_none() {
    let store = SessionStore::new();
    assert!(store.history_snapshot("ghost").await.is_none());
}

#[tokio::test]
async fn per_session_lock_serializes_turn_pairs() {
    let store = Arc::new(SessionStore::new());

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let session = store.get_or_create("shared").await;
            let mut guard = session.lock().await;
            guard.push_turn(Role::User, format!("question {i}"));
            tokio::task::yield_now().await;
            guard.push_turn(Role::Assistant, format!("answer {i}"));
        }));
    }
    for handle in handles {
        handle.await.expect("task should not panic");
    }

    let history = store
        .history_snapshot("shared")
        .await
        .expect("session exists");
    assert_eq!(history.len(), 16);

    // Pairs never interleave: each user turn is followed by its own answer.
    for pair in history.chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].role, Role::Assistant);
        let question = pair[0].text.trim_start_matches("question ");
        let answer = pair[1].text.trim_start_matches("answer ");
        assert_eq!(question, answer);
    }
}

#[test]
fn role_names() {
    assert_eq!(Role::User.as_str(), "user");
    assert_eq!(Role::Assistant.as_str(), "assistant");
}
