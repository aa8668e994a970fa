// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (`FIRESTORE_EMULATOR_HOST` set). They are skipped otherwise.

use chrono::{Duration, Utc};
use habit_tracker::models::{HabitEvent, User};

mod common;
use common::test_db;

/// Generate a unique user ID for test isolation.
fn unique_user_id() -> String {
    format!("test-{}", uuid::Uuid::new_v4())
}

/// Helper to create a basic test user
fn test_user(user_id: &str, email: &str) -> User {
    User {
        id: user_id.to_string(),
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        bio: String::new(),
        image: None,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONNECTION
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_lazy_connect_and_health_check() {
    require_emulator!();

    let db = habit_tracker::db::FirestoreDb::new("test-project");
    assert!(!db.is_connected());

    // health_check connects on demand
    db.health_check().await.unwrap();
    assert!(db.is_connected());

    // Clones share the connection
    let clone = db.clone();
    assert!(clone.is_connected());
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_roundtrip_and_email_lookup() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let email = format!("{}@example.com", user_id);

    assert!(db.get_user(&user_id).await.unwrap().is_none());

    db.claim_email(&email, &user_id).await.unwrap();
    db.upsert_user(&test_user(&user_id, &email)).await.unwrap();

    let fetched = db.get_user(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched.email, email);
    assert_eq!(fetched.name, "Test User");

    let by_email = db.get_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(by_email.id, user_id);

    println!("✓ User stored and found by email: {}", user_id);
}

#[tokio::test]
async fn test_email_claim_is_exclusive() {
    require_emulator!();

    let db = test_db().await;
    let first = unique_user_id();
    let second = unique_user_id();
    // `/` is not allowed in document IDs and must be encoded
    let email = format!("a/b+{}@example.com", first);

    db.claim_email(&email, &first).await.unwrap();
    db.claim_email(&email, &first).await.unwrap();
    assert!(matches!(
        db.claim_email(&email, &second).await,
        Err(habit_tracker::error::AppError::Conflict(_))
    ));

    db.release_email(&email, &first).await.unwrap();
    db.claim_email(&email, &second).await.unwrap();
}

#[tokio::test]
async fn test_user_update_overwrites_fields() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let email = format!("{}@example.com", user_id);

    db.upsert_user(&test_user(&user_id, &email)).await.unwrap();

    let mut updated = test_user(&user_id, &email);
    updated.bio = "Evening runner".to_string();
    updated.image = Some("https://example.com/me.jpg".to_string());
    updated.updated_at = "2026-02-01T00:00:00Z".to_string();
    db.upsert_user(&updated).await.unwrap();

    let fetched = db.get_user(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched.bio, "Evening runner");
    assert_eq!(fetched.image.as_deref(), Some("https://example.com/me.jpg"));
    assert_eq!(fetched.created_at, "2026-01-01T00:00:00Z");
}

// ═══════════════════════════════════════════════════════════════════════════
// HABIT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_habit_events_ordered_and_limited() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_user_id();
    let other = unique_user_id();
    let now = Utc::now();

    for (i, habit) in ["Run", "Read", "Write"].iter().enumerate() {
        let mut event = HabitEvent::new(owner.as_str(), *habit, now)
            .with_context(Some("calm".to_string()), None);
        event.recorded_at = now + Duration::seconds(i as i64);
        db.insert_habit_event(&event).await.unwrap();
    }
    db.insert_habit_event(&HabitEvent::new(other.as_str(), "Swim", now))
        .await
        .unwrap();

    let events = db.get_habit_events(&owner, None).await.unwrap();
    let names: Vec<&str> = events.iter().map(|e| e.habit_name.as_str()).collect();
    assert_eq!(names, vec!["Write", "Read", "Run"]);
    assert_eq!(events[0].emotion.as_deref(), Some("calm"));
    assert_eq!(events[0].environment, None);

    let limited = db.get_habit_events(&owner, Some(2)).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].habit_name, "Write");

    println!("✓ Habit events ordered for owner: {}", owner);
}
