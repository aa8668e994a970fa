// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod insights;
pub mod password;
pub mod streak;

pub use insights::{aggregate, Insights, INSIGHT_WINDOW, TOP_K};
pub use password::{hash_password, verify_password};
pub use streak::current_streak;
