// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consecutive-day streak calculation.
//!
//! A streak is the number of consecutive calendar days, ending today or
//! yesterday, on which a habit was logged at least once. Days are taken in
//! the time zone of the `as_of` timestamp.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::models::HabitEvent;
use crate::time_utils::local_date;

/// Current streak for `habit_name` as of `as_of`.
///
/// Several events on the same day count once. A single missing day ends the
/// streak; if neither today nor yesterday has an event the streak is 0.
pub fn current_streak<Tz: TimeZone>(
    events: &[HabitEvent],
    habit_name: &str,
    as_of: &DateTime<Tz>,
) -> u32 {
    let tz = as_of.timezone();
    let days: BTreeSet<NaiveDate> = events
        .iter()
        .filter(|e| e.habit_name == habit_name)
        .map(|e| local_date(&e.occurred_at, &tz))
        .collect();

    let today = as_of.date_naive();
    let anchor = if days.contains(&today) {
        Some(today)
    } else {
        today.pred_opt().filter(|yesterday| days.contains(yesterday))
    };

    let Some(mut expected) = anchor else {
        return 0;
    };

    // Walk newest-first from the anchor; later days were already handled.
    let mut streak = 0;
    for day in days.range(..=expected).rev() {
        if *day != expected {
            break;
        }
        streak += 1;
        match expected.pred_opt() {
            Some(prev) => expected = prev,
            None => break,
        }
    }

    streak
}
