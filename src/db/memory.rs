// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process storage backend for local development and tests.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::AppError;
use crate::models::{HabitEvent, User};

/// Concurrent in-memory store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<String, User>>,
    /// Normalized email to owning user ID
    emails: Arc<DashMap<String, String>>,
    /// Habit events keyed by owner ID, in insertion order
    habits: Arc<DashMap<String, Vec<HabitEvent>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── User Operations ─────────────────────────────────────────

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|u| u.value().clone())
    }

    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        let user_id = self.emails.get(email)?.value().clone();
        self.get_user(&user_id)
    }

    /// Reserve `email` for `user_id`. Reclaiming one's own email is a no-op.
    pub fn claim_email(&self, email: &str, user_id: &str) -> Result<(), AppError> {
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(owner) if owner.get() != user_id => {
                Err(AppError::Conflict("Email already registered".to_string()))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(user_id.to_string());
                Ok(())
            }
        }
    }

    /// Drop the reservation if `user_id` still holds it.
    pub fn release_email(&self, email: &str, user_id: &str) {
        self.emails.remove_if(email, |_, owner| owner == user_id);
    }

    pub fn upsert_user(&self, user: &User) {
        self.users.insert(user.id.clone(), user.clone());
    }

    // ─── Habit Operations ────────────────────────────────────────

    pub fn insert_habit_event(&self, event: &HabitEvent) -> Result<(), AppError> {
        let mut events = self.habits.entry(event.owner_id.clone()).or_default();
        if events.iter().any(|e| e.id == event.id) {
            return Err(AppError::Database(format!(
                "Habit event {} already exists",
                event.id
            )));
        }
        events.push(event.clone());
        Ok(())
    }

    /// Events for `owner_id`, most recently recorded first.
    pub fn get_habit_events(&self, owner_id: &str, limit: Option<u32>) -> Vec<HabitEvent> {
        let mut events = self
            .habits
            .get(owner_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();

        // Newest insertion wins ties on recorded_at.
        events.reverse();
        events.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

        if let Some(limit) = limit {
            events.truncate(limit as usize);
        }
        events
    }
}
