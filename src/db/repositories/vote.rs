//! Vote repository
//!
//! Database operations for upvotes. Uniqueness per (user, work) pair is
//! enforced by the schema; `add_vote` reports a duplicate as `false` via
//! `INSERT OR IGNORE` rather than surfacing a constraint error.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::Vote;

/// Vote repository trait
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Record an upvote; returns false when the pair has already voted
    async fn add_vote(&self, user_id: i64, work_id: i64) -> Result<bool>;

    /// Check whether the pair has voted
    async fn has_voted(&self, user_id: i64, work_id: i64) -> Result<bool>;

    /// Count votes for a work
    async fn count_for_work(&self, work_id: i64) -> Result<i64>;

    /// List the votes cast for a work, newest first
    async fn list_for_work(&self, work_id: i64) -> Result<Vec<Vote>>;
}

/// SQLx-based vote repository implementation
pub struct SqlxVoteRepository {
    pool: SqlitePool,
}

impl SqlxVoteRepository {
    /// Create a new SQLx vote repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn VoteRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl VoteRepository for SqlxVoteRepository {
    async fn add_vote(&self, user_id: i64, work_id: i64) -> Result<bool> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO votes (user_id, work_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(work_id)
                .execute(&self.pool)
                .await
                .context("Failed to add vote")?;

        Ok(result.rows_affected() > 0)
    }

    async fn has_voted(&self, user_id: i64, work_id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM votes WHERE user_id = ? AND work_id = ?",
        )
        .bind(user_id)
        .bind(work_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check vote")?;

        Ok(count > 0)
    }

    async fn count_for_work(&self, work_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE work_id = ?")
            .bind(work_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count votes")?;

        Ok(count)
    }

    async fn list_for_work(&self, work_id: i64) -> Result<Vec<Vote>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, work_id, created_at
            FROM votes
            WHERE work_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(work_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list votes")?;

        Ok(rows
            .into_iter()
            .map(|r| Vote {
                id: r.get("id"),
                user_id: r.get("user_id"),
                work_id: r.get("work_id"),
                created_at: r.get("created_at"),
            })
            .collect())
    }
}
