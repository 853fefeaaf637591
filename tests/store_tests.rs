//! Tests for the refresh token store: overwrite semantics, compare-and-swap
//! rotation, and the concurrent-renewal race.

use vidcentral::db::Database;

async fn open_db() -> Database {
    Database::open(":memory:")
        .await
        .expect("Failed to open test database")
}

#[tokio::test]
async fn test_record_overwrites_previous_value() {
    let db = open_db().await;
    let store = db.refresh_tokens();

    store.record("u1@example.com", "first", 100, 200).await.unwrap();
    store.record("u1@example.com", "second", 150, 250).await.unwrap();

    assert_eq!(
        store.get("u1@example.com").await.unwrap(),
        Some("second".to_string())
    );
}

#[tokio::test]
async fn test_rotate_succeeds_only_against_current_value() {
    let db = open_db().await;
    let store = db.refresh_tokens();

    store.record("u1@example.com", "current", 100, 200).await.unwrap();

    // Wrong presented value: no swap.
    assert!(!store
        .rotate("u1@example.com", "stale", "next", 150, 250)
        .await
        .unwrap());
    assert_eq!(
        store.get("u1@example.com").await.unwrap(),
        Some("current".to_string())
    );

    // Correct presented value: swap lands.
    assert!(store
        .rotate("u1@example.com", "current", "next", 150, 250)
        .await
        .unwrap());
    assert_eq!(
        store.get("u1@example.com").await.unwrap(),
        Some("next".to_string())
    );

    // The consumed value cannot rotate twice.
    assert!(!store
        .rotate("u1@example.com", "current", "another", 160, 260)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_rotate_for_unknown_subject_fails() {
    let db = open_db().await;

    assert!(!db
        .refresh_tokens()
        .rotate("nobody@example.com", "anything", "next", 100, 200)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_concurrent_rotations_with_same_value_admit_one_winner() {
    let db = open_db().await;
    db.refresh_tokens()
        .record("u1@example.com", "shared", 100, 200)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            db.refresh_tokens()
                .rotate(
                    "u1@example.com",
                    "shared",
                    &format!("next-{}", i),
                    150,
                    250,
                )
                .await
                .unwrap()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1, "Exactly one concurrent renewal may consume a value");
}

#[tokio::test]
async fn test_subjects_are_isolated() {
    let db = open_db().await;
    let store = db.refresh_tokens();

    store.record("a@example.com", "token-a", 100, 200).await.unwrap();
    store.record("b@example.com", "token-b", 100, 200).await.unwrap();

    // Rotating A's token leaves B's untouched.
    assert!(store
        .rotate("a@example.com", "token-a", "token-a2", 150, 250)
        .await
        .unwrap());
    assert_eq!(
        store.get("b@example.com").await.unwrap(),
        Some("token-b".to_string())
    );

    // A's value cannot be presented for B.
    assert!(!store
        .rotate("b@example.com", "token-a2", "x", 160, 260)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_clear_and_delete_expired() {
    let db = open_db().await;
    let store = db.refresh_tokens();

    store.record("a@example.com", "token-a", 100, 200).await.unwrap();
    store.record("b@example.com", "token-b", 100, 500).await.unwrap();
    store.record("c@example.com", "token-c", 100, 501).await.unwrap();

    assert!(store.clear("a@example.com").await.unwrap());
    assert!(!store.clear("a@example.com").await.unwrap());

    // expires_at <= now is gone, strictly-later survives.
    let removed = store.delete_expired(500).await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.get("b@example.com").await.unwrap(), None);
    assert_eq!(
        store.get("c@example.com").await.unwrap(),
        Some("token-c".to_string())
    );
}
