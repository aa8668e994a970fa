// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Habit Tracker: log habits and see what drives them
//!
//! This crate provides the backend API for recording habit events,
//! computing calendar-day streaks and summarizing emotional and
//! environmental triggers.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
}

impl AppState {
    /// Build state with the storage backend named in `config`.
    ///
    /// The backend is not contacted until first use or an explicit
    /// [`Database::connect`].
    pub fn new(config: Config) -> Self {
        let db = Database::from_config(&config);
        Self { config, db }
    }
}
