// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development. Secrets are read once at
//! startup and kept in memory.

use std::env;
use std::str::FromStr;

/// Which storage backend to use for users and habit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local maps; data is lost on restart.
    Memory,
    /// Google Cloud Firestore (or its emulator).
    Firestore,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "firestore" => Ok(Self::Firestore),
            _ => Err(ConfigError::Invalid("STORAGE_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL (CORS origin; `https` turns on Secure cookies)
    pub frontend_url: String,
    /// GCP project ID used by the Firestore backend
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Storage backend selection
    pub storage_backend: StorageBackend,
    /// Default offset (minutes east of UTC) for calendar-day math
    pub utc_offset_minutes: i32,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StorageBackend::Memory,
        };

        let utc_offset_minutes = match env::var("UTC_OFFSET_MINUTES") {
            Ok(raw) => {
                let minutes: i32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("UTC_OFFSET_MINUTES", raw.clone()))?;
                if crate::time_utils::utc_offset_from_minutes(minutes).is_none() {
                    return Err(ConfigError::Invalid("UTC_OFFSET_MINUTES", raw));
                }
                minutes
            }
            Err(_) => 0,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage_backend,
            utc_offset_minutes,
            jwt_signing_key: parse_signing_key(
                &env::var("JWT_SIGNING_KEY").map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?,
            )?,
        })
    }

    /// Deterministic configuration for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            storage_backend: StorageBackend::Memory,
            utc_offset_minutes: 0,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Whether session cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

/// HS256 key bytes. A blank key would sign with an empty secret.
fn parse_signing_key(raw: &str) -> Result<Vec<u8>, ConfigError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(ConfigError::Invalid(
            "JWT_SIGNING_KEY",
            "must not be empty".to_string(),
        ));
    }
    Ok(key.as_bytes().to_vec())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
