// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile and credentials)
//! - Habits (append-only habit events)
//!
//! The underlying client is created on first use and shared by all clones.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::db::collections;
use crate::error::AppError;
use crate::models::{HabitEvent, User};

/// Document ID looked up by the health check. It never exists.
const HEALTH_PROBE_ID: &str = "__health_probe__";

/// Reservation document in `user_emails`, keyed by encoded email.
#[derive(Debug, Serialize, Deserialize)]
struct EmailClaim {
    user_id: String,
}

/// Emails may contain `/`, which Firestore document IDs cannot.
fn email_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    project_id: String,
    client: Arc<OnceCell<firestore::FirestoreDb>>,
}

impl FirestoreDb {
    /// Create a handle for `project_id` without connecting.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            client: Arc::new(OnceCell::new()),
        }
    }

    /// Connect if not yet connected and return the shared client.
    pub async fn connect(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .get_or_try_init(|| Self::open(&self.project_id))
            .await
    }

    /// Whether a connection has been established.
    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    /// Round-trip a single document read.
    pub async fn health_check(&self) -> Result<(), AppError> {
        let _: Option<User> = self
            .connect()
            .await?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(HEALTH_PROBE_ID)
            .await
            .map_err(|e| AppError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn open(project_id: &str) -> Result<firestore::FirestoreDb, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::open_emulator(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");
        Ok(client)
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn open_emulator(project_id: &str) -> Result<firestore::FirestoreDb, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );
        Ok(client)
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.connect()
            .await?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by (normalized) email via its reservation.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match self.email_owner(&email_doc_id(email)).await? {
            Some(user_id) => self.get_user(&user_id).await,
            None => Ok(None),
        }
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .connect()
            .await?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Reserve `email` for `user_id`.
    ///
    /// The create fails if the document already exists, so only one
    /// concurrent claimant wins. Reclaiming one's own email succeeds.
    pub async fn claim_email(&self, email: &str, user_id: &str) -> Result<(), AppError> {
        let doc_id = email_doc_id(email);
        let claim = EmailClaim {
            user_id: user_id.to_string(),
        };

        let inserted: Result<EmailClaim, _> = self
            .connect()
            .await?
            .fluent()
            .insert()
            .into(collections::USER_EMAILS)
            .document_id(&doc_id)
            .object(&claim)
            .execute()
            .await;

        match inserted {
            Ok(_) => Ok(()),
            Err(insert_err) => match self.email_owner(&doc_id).await? {
                Some(owner) if owner == user_id => Ok(()),
                Some(_) => Err(AppError::Conflict("Email already registered".to_string())),
                None => Err(AppError::Database(format!(
                    "Failed to claim email: {}",
                    insert_err
                ))),
            },
        }
    }

    /// Drop the reservation if `user_id` still holds it.
    pub async fn release_email(&self, email: &str, user_id: &str) -> Result<(), AppError> {
        let doc_id = email_doc_id(email);
        if self.email_owner(&doc_id).await?.as_deref() != Some(user_id) {
            return Ok(());
        }

        self.connect()
            .await?
            .fluent()
            .delete()
            .from(collections::USER_EMAILS)
            .document_id(&doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn email_owner(&self, doc_id: &str) -> Result<Option<String>, AppError> {
        let claim: Option<EmailClaim> = self
            .connect()
            .await?
            .fluent()
            .select()
            .by_id_in(collections::USER_EMAILS)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(claim.map(|c| c.user_id))
    }

    // ─── Habit Operations ────────────────────────────────────────

    /// Store a new habit event. Fails if the ID already exists.
    pub async fn insert_habit_event(&self, event: &HabitEvent) -> Result<(), AppError> {
        let _: HabitEvent = self
            .connect()
            .await?
            .fluent()
            .insert()
            .into(collections::HABITS)
            .document_id(&event.id)
            .object(event)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a user's habit events, most recently recorded first.
    pub async fn get_habit_events(
        &self,
        owner_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<HabitEvent>, AppError> {
        let query = self
            .connect()
            .await?
            .fluent()
            .select()
            .from(collections::HABITS)
            .filter(|q| q.for_all([q.field("owner_id").eq(owner_id)]))
            .order_by([("recorded_at", firestore::FirestoreQueryDirection::Descending)]);

        let query = match limit {
            Some(limit) => query.limit(limit),
            None => query,
        };

        query
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
