//! User service
//!
//! Implements authentication business logic:
//! - Login/logout with argon2-verified credentials
//! - Session creation and validation
//! - Fixture seeding (users are provisioned out of band, never through a
//!   public endpoint)

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{Session, User};
use crate::services::password::{hash_password, verify_password};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Default session expiration time in days
const DEFAULT_SESSION_EXPIRATION_DAYS: i64 = 7;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// User service for authentication and session management
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_expiration_days: i64,
}

impl UserService {
    /// Create a new user service with the given repositories
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_expiration_days: DEFAULT_SESSION_EXPIRATION_DAYS,
        }
    }

    /// Create a new user service with custom session expiration
    pub fn with_session_expiration(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_expiration_days: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_expiration_days,
        }
    }

    /// Login with credentials.
    ///
    /// Validates the username and password and creates a new session if
    /// valid. Returns `AuthenticationError` for an unknown username or a
    /// wrong password; the two cases are indistinguishable to the caller.
    pub async fn login(&self, input: LoginInput) -> Result<Session, UserServiceError> {
        let user = self
            .user_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to get user by username")?
            .ok_or_else(|| {
                UserServiceError::AuthenticationError(
                    "Invalid username or password".to_string(),
                )
            })?;

        let password_valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            return Err(UserServiceError::AuthenticationError(
                "Invalid username or password".to_string(),
            ));
        }

        let session = self.create_session(user.id).await?;

        Ok(session)
    }

    /// Logout (invalidate session).
    ///
    /// Deleting a session that does not exist is not an error.
    pub async fn logout(&self, session_id: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(session_id)
            .await
            .context("Failed to delete session")?;

        Ok(())
    }

    /// Validate a session token and return the associated user.
    ///
    /// Returns `None` when the session does not exist or is expired; an
    /// expired session row is deleted on sight.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let session = match self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to get session")?
        {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.is_expired() {
            let _ = self.session_repo.delete(token).await;
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to get user")?;

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user by ID")?;

        Ok(user)
    }

    /// Seed fixture users when the users table is empty.
    ///
    /// Users are provisioned out of band; this is the only way rows enter
    /// the users table. Returns how many users were inserted (zero when the
    /// table was already populated).
    pub async fn seed_users(
        &self,
        fixtures: &[(&str, &str)],
    ) -> Result<usize, UserServiceError> {
        let count = self
            .user_repo
            .count()
            .await
            .context("Failed to count users")?;

        if count > 0 {
            return Ok(0);
        }

        let mut created = 0;
        for (username, password) in fixtures {
            let password_hash = hash_password(password).context("Failed to hash password")?;
            let user = User::new(username.to_string(), password_hash);
            self.user_repo
                .create(&user)
                .await
                .context("Failed to create seed user")?;
            created += 1;
        }

        Ok(created)
    }

    /// Delete all expired sessions, returning how many were removed
    pub async fn cleanup_expired_sessions(&self) -> Result<i64, UserServiceError> {
        let count = self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to delete expired sessions")?;

        Ok(count)
    }

    /// Create a new session for a user
    async fn create_session(&self, user_id: i64) -> Result<Session, UserServiceError> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + Duration::days(self.session_expiration_days),
            created_at: now,
        };

        let created = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        Ok(created)
    }
}

/// Input for user login
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    /// Create a new login input
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxSessionRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};

    const FIXTURES: &[(&str, &str)] = &[("grace", "hopper123"), ("ada", "lovelace123")];

    async fn setup_test_service() -> UserService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let session_repo = SqlxSessionRepository::boxed(pool.clone());
        UserService::new(user_repo, session_repo)
    }

    async fn seeded_service() -> UserService {
        let service = setup_test_service().await;
        service.seed_users(FIXTURES).await.expect("Failed to seed");
        service
    }

    // ========================================================================
    // Seeding tests
    // ========================================================================

    #[tokio::test]
    async fn test_seed_users_populates_empty_table() {
        let service = setup_test_service().await;

        let created = service.seed_users(FIXTURES).await.unwrap();
        assert_eq!(created, 2);
    }

    #[tokio::test]
    async fn test_seed_users_is_idempotent() {
        let service = seeded_service().await;

        let created = service.seed_users(FIXTURES).await.unwrap();
        assert_eq!(created, 0);
    }

    #[tokio::test]
    async fn test_seeded_passwords_are_hashed() {
        let service = seeded_service().await;

        let session = service
            .login(LoginInput::new("grace", "hopper123"))
            .await
            .unwrap();
        let user = service
            .validate_session(&session.id)
            .await
            .unwrap()
            .unwrap();

        assert_ne!(user.password_hash, "hopper123");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    // ========================================================================
    // Login tests
    // ========================================================================

    #[tokio::test]
    async fn test_login_success() {
        let service = seeded_service().await;

        let session = service
            .login(LoginInput::new("grace", "hopper123"))
            .await
            .expect("Failed to login");

        assert!(!session.id.is_empty());
        assert!(!session.is_expired());
    }

    #[tokio::test]
    async fn test_login_wrong_password_fails() {
        let service = seeded_service().await;

        let result = service.login(LoginInput::new("grace", "wrongpassword")).await;
        assert!(matches!(
            result,
            Err(UserServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_login_nonexistent_user_fails() {
        let service = seeded_service().await;

        let result = service.login(LoginInput::new("nobody", "hopper123")).await;
        assert!(matches!(
            result,
            Err(UserServiceError::AuthenticationError(_))
        ));
    }

    // ========================================================================
    // Session validation tests
    // ========================================================================

    #[tokio::test]
    async fn test_validate_session_success() {
        let service = seeded_service().await;

        let session = service
            .login(LoginInput::new("grace", "hopper123"))
            .await
            .unwrap();

        let user = service
            .validate_session(&session.id)
            .await
            .unwrap()
            .expect("Session should resolve to a user");

        assert_eq!(user.username, "grace");
        assert_eq!(user.id, session.user_id);
    }

    #[tokio::test]
    async fn test_validate_session_nonexistent_returns_none() {
        let service = seeded_service().await;

        let result = service
            .validate_session("nonexistent-session-id")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_validate_expired_session_returns_none() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();

        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let session_repo = SqlxSessionRepository::boxed(pool.clone());

        // -1 day expiration: sessions are born expired
        let service = UserService::with_session_expiration(user_repo, session_repo, -1);
        service.seed_users(FIXTURES).await.unwrap();

        let session = service
            .login(LoginInput::new("grace", "hopper123"))
            .await
            .unwrap();
        assert!(session.is_expired());

        let result = service.validate_session(&session.id).await.unwrap();
        assert!(result.is_none());
    }

    // ========================================================================
    // Logout tests
    // ========================================================================

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let service = seeded_service().await;

        let session = service
            .login(LoginInput::new("grace", "hopper123"))
            .await
            .unwrap();

        service.logout(&session.id).await.expect("Failed to logout");

        let result = service.validate_session(&session.id).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_logout_nonexistent_session_succeeds() {
        let service = seeded_service().await;

        let result = service.logout("nonexistent-session-id").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_multiple_sessions_per_user() {
        let service = seeded_service().await;

        let session1 = service
            .login(LoginInput::new("grace", "hopper123"))
            .await
            .unwrap();
        let session2 = service
            .login(LoginInput::new("grace", "hopper123"))
            .await
            .unwrap();

        assert_ne!(session1.id, session2.id);
        assert!(service.validate_session(&session1.id).await.unwrap().is_some());
        assert!(service.validate_session(&session2.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cleanup_expired_sessions() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();

        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let session_repo = SqlxSessionRepository::boxed(pool.clone());
        let service = UserService::with_session_expiration(user_repo, session_repo, -1);
        service.seed_users(FIXTURES).await.unwrap();

        service
            .login(LoginInput::new("grace", "hopper123"))
            .await
            .unwrap();

        let count = service.cleanup_expired_sessions().await.unwrap();
        assert_eq!(count, 1);
    }
}
