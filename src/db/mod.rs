//! Database layer.
//!
//! [`Database`] is the handle owned by the application state. It wraps one
//! of two backends chosen from configuration.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::models::{HabitEvent, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email reservations (document ID is the encoded email)
    pub const USER_EMAILS: &str = "user_emails";
    /// Append-only habit events (owner_id field links to users)
    pub const HABITS: &str = "habits";
}

/// Storage handle shared by request handlers.
#[derive(Clone)]
pub enum Database {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl Database {
    /// Build the backend selected in `config`. Nothing is connected yet.
    pub fn from_config(config: &Config) -> Self {
        match config.storage_backend {
            StorageBackend::Firestore => Self::Firestore(FirestoreDb::new(&config.gcp_project_id)),
            StorageBackend::Memory => Self::Memory(MemoryDb::new()),
        }
    }

    /// Establish the backend connection (no-op for memory).
    pub async fn connect(&self) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.connect().await.map(|_| ()),
            Self::Memory(_) => Ok(()),
        }
    }

    /// Verify the backend is reachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.health_check().await,
            Self::Memory(_) => Ok(()),
        }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match self {
            Self::Firestore(db) => db.get_user(user_id).await,
            Self::Memory(db) => Ok(db.get_user(user_id)),
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match self {
            Self::Firestore(db) => db.get_user_by_email(email).await,
            Self::Memory(db) => Ok(db.get_user_by_email(email)),
        }
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.upsert_user(user).await,
            Self::Memory(db) => {
                db.upsert_user(user);
                Ok(())
            }
        }
    }

    /// Atomically reserve `email` for `user_id`; `Conflict` if another
    /// user holds it.
    pub async fn claim_email(&self, email: &str, user_id: &str) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.claim_email(email, user_id).await,
            Self::Memory(db) => db.claim_email(email, user_id),
        }
    }

    pub async fn release_email(&self, email: &str, user_id: &str) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.release_email(email, user_id).await,
            Self::Memory(db) => {
                db.release_email(email, user_id);
                Ok(())
            }
        }
    }

    pub async fn insert_habit_event(&self, event: &HabitEvent) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.insert_habit_event(event).await,
            Self::Memory(db) => db.insert_habit_event(event),
        }
    }

    /// A user's habit events, most recently recorded first.
    ///
    /// `limit` of `None` returns the full history.
    pub async fn get_habit_events(
        &self,
        owner_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<HabitEvent>, AppError> {
        match self {
            Self::Firestore(db) => db.get_habit_events(owner_id, limit).await,
            Self::Memory(db) => Ok(db.get_habit_events(owner_id, limit)),
        }
    }
}
