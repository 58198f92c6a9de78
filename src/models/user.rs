//! User model
//!
//! Users are provisioned out of band (seed data); the service never creates
//! them through a public endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a registered user in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the user joined
    pub joined_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// Note: The password should already be hashed before calling this
    /// function. Use `services::password::hash_password()` to hash it.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: 0, // Will be set by the database
            username,
            password_hash,
            joined_at: Utc::now(),
        }
    }
}
