// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod habit;
pub mod stats;
pub mod user;

pub use habit::HabitEvent;
pub use stats::{DashboardStats, HabitStreak, WeekdayCount};
pub use user::{User, UserProfile};
