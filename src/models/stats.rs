//! Dashboard aggregates computed from a user's habit history.
//!
//! Unlike insights, these use the full event list and calendar days in the
//! caller's time zone.

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::HabitEvent;
use crate::services::streak::current_streak;
use crate::time_utils::local_date;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Dashboard summary for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardStats {
    // ─── Totals ──────────────────────────────────────────────────
    /// All events ever logged
    pub total_events: u32,
    /// Events whose day is today
    pub logged_today: u32,
    /// Habits with a current streak above zero
    pub active_streaks: u32,

    // ─── Per Habit ───────────────────────────────────────────────
    /// One entry per distinct habit, in first-seen order
    pub habits: Vec<HabitStreak>,

    // ─── Weekly Pattern ──────────────────────────────────────────
    /// Event counts per weekday, Sunday first
    pub weekly: Vec<WeekdayCount>,
}

/// Streak and volume for one habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HabitStreak {
    pub habit: String,
    pub current_streak: u32,
    pub total_logs: u32,
}

/// Number of events on one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeekdayCount {
    pub day: String,
    pub count: u32,
}

impl DashboardStats {
    /// Build the dashboard from `events` (most-recent-first) as of `as_of`.
    pub fn from_events<Tz: TimeZone>(events: &[HabitEvent], as_of: &DateTime<Tz>) -> Self {
        let tz = as_of.timezone();
        let today = as_of.date_naive();

        let mut order: Vec<&str> = Vec::new();
        let mut totals: HashMap<&str, u32> = HashMap::new();
        let mut weekly = [0u32; 7];
        let mut logged_today = 0;

        for event in events {
            let habit = event.habit_name.as_str();
            let total = totals.entry(habit).or_insert_with(|| {
                order.push(habit);
                0
            });
            *total += 1;

            let day = local_date(&event.occurred_at, &tz);
            weekly[day.weekday().num_days_from_sunday() as usize] += 1;
            if day == today {
                logged_today += 1;
            }
        }

        let habits: Vec<HabitStreak> = order
            .into_iter()
            .map(|habit| HabitStreak {
                habit: habit.to_string(),
                current_streak: current_streak(events, habit, as_of),
                total_logs: totals.get(habit).copied().unwrap_or(0),
            })
            .collect();

        let active_streaks = habits.iter().filter(|h| h.current_streak > 0).count() as u32;

        Self {
            total_events: events.len() as u32,
            logged_today,
            active_streaks,
            habits,
            weekly: WEEKDAY_LABELS
                .iter()
                .zip(weekly)
                .map(|(day, count)| WeekdayCount {
                    day: day.to_string(),
                    count,
                })
                .collect(),
        }
    }
}
