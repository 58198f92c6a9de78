//! Work repository
//!
//! Database operations for catalog works. Vote counts are always derived
//! from the votes table with a correlated subquery; they are never stored
//! on the work row.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::{Category, Work, WorkWithVotes};

/// Work repository trait
#[async_trait]
pub trait WorkRepository: Send + Sync {
    /// Create a new work, returning it with its assigned id
    async fn create(
        &self,
        title: &str,
        category: Category,
        creator: Option<&str>,
        publication_year: Option<i32>,
        description: Option<&str>,
    ) -> Result<Work>;

    /// Get a work by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Work>>;

    /// Get a work by ID together with its vote count
    async fn get_with_votes(&self, id: i64) -> Result<Option<WorkWithVotes>>;

    /// List all works with vote counts, highest-voted first
    async fn list_with_votes(&self) -> Result<Vec<WorkWithVotes>>;

    /// List the top works in one category, highest-voted first
    async fn top_in_category(&self, category: Category, limit: i64) -> Result<Vec<WorkWithVotes>>;

    /// The single highest-voted work across all categories, if any
    async fn spotlight(&self) -> Result<Option<WorkWithVotes>>;

    /// Update a work's fields; returns false when the id does not exist
    async fn update(
        &self,
        id: i64,
        title: &str,
        category: Category,
        creator: Option<&str>,
        publication_year: Option<i32>,
        description: Option<&str>,
    ) -> Result<bool>;

    /// Delete a work; returns false when the id does not exist
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Count all works
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based work repository implementation
pub struct SqlxWorkRepository {
    pool: SqlitePool,
}

impl SqlxWorkRepository {
    /// Create a new SQLx work repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn WorkRepository> {
        Arc::new(Self::new(pool))
    }
}

const WITH_VOTES_SELECT: &str = r#"
    SELECT w.id, w.title, w.category, w.creator, w.publication_year,
           w.description, w.created_at,
           (SELECT COUNT(*) FROM votes WHERE work_id = w.id) AS vote_count
    FROM works w
"#;

#[async_trait]
impl WorkRepository for SqlxWorkRepository {
    async fn create(
        &self,
        title: &str,
        category: Category,
        creator: Option<&str>,
        publication_year: Option<i32>,
        description: Option<&str>,
    ) -> Result<Work> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO works (title, category, creator, publication_year, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(category.to_string())
        .bind(creator)
        .bind(publication_year)
        .bind(description)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create work")?;

        Ok(Work {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            category,
            creator: creator.map(String::from),
            publication_year,
            description: description.map(String::from),
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Work>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, category, creator, publication_year, description, created_at
            FROM works
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get work by ID")?;

        row.map(row_to_work).transpose()
    }

    async fn get_with_votes(&self, id: i64) -> Result<Option<WorkWithVotes>> {
        let sql = format!("{} WHERE w.id = ?", WITH_VOTES_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get work with votes")?;

        row.map(row_to_work_with_votes).transpose()
    }

    async fn list_with_votes(&self) -> Result<Vec<WorkWithVotes>> {
        let sql = format!("{} ORDER BY vote_count DESC, w.title ASC", WITH_VOTES_SELECT);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list works")?;

        rows.into_iter().map(row_to_work_with_votes).collect()
    }

    async fn top_in_category(&self, category: Category, limit: i64) -> Result<Vec<WorkWithVotes>> {
        let sql = format!(
            "{} WHERE w.category = ? ORDER BY vote_count DESC, w.title ASC LIMIT ?",
            WITH_VOTES_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(category.to_string())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list top works in category")?;

        rows.into_iter().map(row_to_work_with_votes).collect()
    }

    async fn spotlight(&self) -> Result<Option<WorkWithVotes>> {
        // Ties break toward the older row
        let sql = format!("{} ORDER BY vote_count DESC, w.id ASC LIMIT 1", WITH_VOTES_SELECT);
        let row = sqlx::query(&sql)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get spotlight work")?;

        row.map(row_to_work_with_votes).transpose()
    }

    async fn update(
        &self,
        id: i64,
        title: &str,
        category: Category,
        creator: Option<&str>,
        publication_year: Option<i32>,
        description: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE works
            SET title = ?, category = ?, creator = ?, publication_year = ?, description = ?
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(category.to_string())
        .bind(creator)
        .bind(publication_year)
        .bind(description)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update work")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM works WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete work")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM works")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count works")?;

        Ok(count)
    }
}

fn row_to_work(row: sqlx::sqlite::SqliteRow) -> Result<Work> {
    let category: String = row.get("category");
    Ok(Work {
        id: row.get("id"),
        title: row.get("title"),
        category: category
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Stored category is invalid")?,
        creator: row.get("creator"),
        publication_year: row.get("publication_year"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    })
}

fn row_to_work_with_votes(row: sqlx::sqlite::SqliteRow) -> Result<WorkWithVotes> {
    let vote_count: i64 = row.get("vote_count");
    Ok(WorkWithVotes {
        work: row_to_work(row)?,
        vote_count,
    })
}
