// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Habit event model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One logged occurrence of a habit. Append-only: never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HabitEvent {
    /// Event ID (also used as document ID)
    pub id: String,
    /// ID of the user who logged the event
    pub owner_id: String,
    /// Free-text habit label
    pub habit_name: String,
    /// When the habit happened (user supplied)
    #[serde(with = "crate::time_utils::rfc3339_millis")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub occurred_at: DateTime<Utc>,
    /// Mood label, e.g. "happy"
    #[serde(default)]
    pub emotion: Option<String>,
    /// Place label, e.g. "home"
    #[serde(default)]
    pub environment: Option<String>,
    /// Server-side creation time
    #[serde(with = "crate::time_utils::rfc3339_millis")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub recorded_at: DateTime<Utc>,
}

impl HabitEvent {
    /// Create a new event with a fresh ID, recorded now.
    pub fn new(
        owner_id: impl Into<String>,
        habit_name: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            habit_name: habit_name.into(),
            occurred_at,
            emotion: None,
            environment: None,
            recorded_at: Utc::now(),
        }
    }

    /// Attach mood and place labels.
    pub fn with_context(mut self, emotion: Option<String>, environment: Option<String>) -> Self {
        self.emotion = emotion;
        self.environment = environment;
        self
    }
}
