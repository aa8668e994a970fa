//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (also used as document ID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (unique, used for login)
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    /// Free-text bio
    #[serde(default)]
    pub bio: String,
    /// Avatar image URL
    #[serde(default)]
    pub image: Option<String>,
    /// When the account was created
    pub created_at: String,
    /// Last profile change
    pub updated_at: String,
}

/// Public view of a user (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub image: Option<String>,
    pub created_at: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            image: user.image.clone(),
            created_at: user.created_at.clone(),
        }
    }
}
