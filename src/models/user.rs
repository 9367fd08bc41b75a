//! User row type and mutation inputs
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     username TEXT NOT NULL UNIQUE,
//!     email TEXT NOT NULL UNIQUE,
//!     password TEXT NOT NULL,
//!     first_name TEXT,
//!     last_name TEXT,
//!     avatar_url TEXT,
//!     role TEXT NOT NULL DEFAULT 'user',
//!     is_active BOOLEAN NOT NULL DEFAULT 1,
//!     created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
//!     updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned to users created without an explicit role.
pub const DEFAULT_ROLE: &str = "user";

/// A user account row
///
/// `username` and `email` are unique across all records. `id` and
/// `created_at` are store-assigned and immutable; `updated_at` advances on
/// every mutation.
///
/// The password column holds whatever credential material the caller
/// supplied; hashing is the caller's responsibility, this layer stores it
/// opaquely.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Store-assigned row id
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Opaque credential material, stored as given
    pub password: String,

    /// Optional given name
    pub first_name: Option<String>,

    /// Optional family name
    pub last_name: Option<String>,

    /// Optional avatar/profile picture URL
    pub avatar_url: Option<String>,

    /// Free-form role label (defaults to "user")
    pub role: String,

    /// Whether the account is active
    pub is_active: bool,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last mutated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// Username, email, and password are required. Unsupplied optional fields
/// default to NULL; `role` defaults to "user" and `is_active` to true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login name (must be unique)
    pub username: String,

    /// Email address (must be unique)
    pub email: String,

    /// Opaque credential material (NOT hashed by this layer)
    pub password: String,

    /// Optional given name
    pub first_name: Option<String>,

    /// Optional family name
    pub last_name: Option<String>,

    /// Optional avatar URL
    pub avatar_url: Option<String>,

    /// Role label; None means "user"
    pub role: Option<String>,

    /// Active flag; None means true
    pub is_active: Option<bool>,
}

/// Input for partially updating an existing user
///
/// Only fields that are `Some` are written. Nullable columns use a double
/// `Option` so a caller can distinguish "leave alone" (`None`) from "clear
/// to NULL" (`Some(None)`). The row id and both timestamps are never
/// settable through this type; `updated_at` is stamped by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New login name
    pub username: Option<String>,

    /// New email address
    pub email: Option<String>,

    /// New credential material
    pub password: Option<String>,

    /// New given name (use Some(None) to clear)
    pub first_name: Option<Option<String>>,

    /// New family name (use Some(None) to clear)
    pub last_name: Option<Option<String>>,

    /// New avatar URL (use Some(None) to clear)
    pub avatar_url: Option<Option<String>>,

    /// New role label
    pub role: Option<String>,

    /// New active flag
    pub is_active: Option<bool>,
}

impl UpdateUser {
    /// True when no field is set, i.e. the update would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.avatar_url.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
            first_name: None,
            last_name: None,
            avatar_url: None,
            role: None,
            is_active: None,
        };

        assert_eq!(create_user.username, "alice");
        assert_eq!(create_user.email, "alice@example.com");
    }

    #[test]
    fn test_update_user_default_is_empty() {
        let update = UpdateUser::default();
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_user_clearing_field_is_not_empty() {
        let update = UpdateUser {
            avatar_url: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
