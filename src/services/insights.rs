// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Insight summaries over a user's most recent habit events.
//!
//! Everything here works on the fetched window as given (most-recent-first).
//! The "streaks" reported are adjacency runs inside that window, not calendar
//! streaks; see [`crate::services::streak`] for the latter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::HabitEvent;

/// Number of most recent events considered.
pub const INSIGHT_WINDOW: usize = 30;
/// Entries kept per ranked list.
pub const TOP_K: usize = 5;

/// Label used when an event has no emotion or environment.
const UNSPECIFIED: &str = "unspecified";

const NO_DATA_SUGGESTION: &str = "No habit data yet. Log some habits first!";
const SUGGESTIONS: [&str; 2] = [
    "Keep logging your habits consistently!",
    "Try to maintain streaks!",
];

/// Insight summary response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Insights {
    /// Most frequent "<emotion> in <environment>" pairings
    pub triggers: Vec<String>,
    /// "<habit>: <n> day(s)" for the longest adjacency runs
    pub streaks: Vec<String>,
    /// Static advice
    pub suggestions: Vec<String>,
}

/// Counter that remembers first-seen order for stable tie-breaking.
#[derive(Default)]
struct OrderedCounts {
    index: HashMap<String, usize>,
    entries: Vec<(String, u32)>,
}

impl OrderedCounts {
    fn slot(&mut self, key: &str) -> &mut u32 {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.entries.push((key.to_string(), 0));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    /// Entries sorted by value descending; ties keep first-seen order.
    fn ranked(mut self) -> Vec<(String, u32)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
    }
}

/// Trigger key for one event.
fn trigger_key(event: &HabitEvent) -> String {
    format!(
        "{} in {}",
        event.emotion.as_deref().unwrap_or(UNSPECIFIED),
        event.environment.as_deref().unwrap_or(UNSPECIFIED)
    )
}

/// Trigger keys with their frequencies, most frequent first.
pub fn trigger_counts(events: &[HabitEvent]) -> Vec<(String, u32)> {
    let mut counts = OrderedCounts::default();
    for event in events {
        *counts.slot(&trigger_key(event)) += 1;
    }
    counts.ranked()
}

/// Longest run of adjacent events per habit, longest first.
///
/// A run grows while consecutive events in the given order share a habit
/// name. Calendar dates are not consulted.
pub fn adjacent_runs(events: &[HabitEvent]) -> Vec<(String, u32)> {
    let mut best = OrderedCounts::default();
    let mut previous: Option<&str> = None;
    let mut run = 0u32;

    for event in events {
        let habit = event.habit_name.as_str();
        if previous == Some(habit) {
            run += 1;
        } else {
            run = 1;
            previous = Some(habit);
        }
        let slot = best.slot(habit);
        *slot = (*slot).max(run);
    }

    best.ranked()
}

/// Build insights from the first `limit` events, keeping `top_k` per list.
pub fn aggregate(events: &[HabitEvent], limit: usize, top_k: usize) -> Insights {
    let window = &events[..events.len().min(limit)];

    if window.is_empty() {
        return Insights {
            triggers: vec![],
            streaks: vec![],
            suggestions: vec![NO_DATA_SUGGESTION.to_string()],
        };
    }

    let triggers = trigger_counts(window)
        .into_iter()
        .take(top_k)
        .map(|(key, _)| key)
        .collect();

    let streaks = adjacent_runs(window)
        .into_iter()
        .take(top_k)
        .map(|(habit, count)| format!("{}: {} day(s)", habit, count))
        .collect();

    Insights {
        triggers,
        streaks,
        suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
    }
}
