//! Database migrations module
//!
//! Code-based migrations for the Media Ranker service. All migrations are
//! embedded directly in Rust code as SQL strings for single-binary
//! deployment.
//!
//! # Usage
//!
//! ```ignore
//! use media_ranker::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```
//!
//! Each migration is a `Migration` struct with a unique `version` used for
//! ordering, a human-readable `name`, and the SQL to apply. Applied versions
//! are tracked in the `_migrations` table.

use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements to apply
    pub up: &'static str,
}

/// All migrations for the Media Ranker service.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_users",
        up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username VARCHAR(50) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                joined_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
        "#,
    },
    Migration {
        version: 2,
        name: "create_sessions",
        up: r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id VARCHAR(64) PRIMARY KEY,
                user_id INTEGER NOT NULL,
                expires_at TIMESTAMP NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
        "#,
    },
    Migration {
        version: 3,
        name: "create_works",
        up: r#"
            CREATE TABLE IF NOT EXISTS works (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                category VARCHAR(20) NOT NULL,
                creator VARCHAR(255),
                publication_year INTEGER,
                description TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_works_category ON works(category);
        "#,
    },
    Migration {
        version: 4,
        name: "create_votes",
        up: r#"
            CREATE TABLE IF NOT EXISTS votes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                work_id INTEGER NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (work_id) REFERENCES works(id) ON DELETE CASCADE,
                UNIQUE (user_id, work_id)
            );
            CREATE INDEX IF NOT EXISTS idx_votes_work_id ON votes(work_id);
        "#,
    },
];

/// Run all pending migrations.
///
/// Returns the number of migrations applied.
pub async fn run_migrations(pool: &SqlitePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_versions(pool).await?;

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create migrations table")?;

    Ok(())
}

/// Get the versions of all applied migrations
async fn get_applied_versions(pool: &SqlitePool) -> Result<Vec<i32>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to query applied migrations")?;

    Ok(rows.iter().map(|r| r.get::<i32, _>("version")).collect())
}

/// Apply a single migration and record it
async fn apply_migration(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    // SQLite executes one statement per call; split on semicolons
    for statement in migration.up.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed statement in migration {}", migration.name))?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await
        .context("Failed to record migration")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[tokio::test]
    async fn test_run_migrations_applies_all() {
        let pool = create_test_pool().await.unwrap();

        let count = run_migrations(&pool).await.expect("Migrations should apply");
        assert_eq!(count, MIGRATIONS.len());
    }

    #[tokio::test]
    async fn test_run_migrations_is_idempotent() {
        let pool = create_test_pool().await.unwrap();

        run_migrations(&pool).await.unwrap();
        let second_run = run_migrations(&pool).await.unwrap();
        assert_eq!(second_run, 0);
    }

    #[tokio::test]
    async fn test_migrations_create_expected_tables() {
        let pool = create_test_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        for table in ["users", "sessions", "works", "votes"] {
            let found: Option<String> = sqlx::query_scalar(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_optional(&pool)
            .await
            .unwrap();
            assert_eq!(found.as_deref(), Some(table), "missing table {}", table);
        }
    }

    #[tokio::test]
    async fn test_vote_uniqueness_constraint() {
        let pool = create_test_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        sqlx::query("INSERT INTO users (username, password_hash) VALUES ('grace', 'hash')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO works (title, category) VALUES ('Test', 'album')")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("INSERT INTO votes (user_id, work_id) VALUES (1, 1)")
            .execute(&pool)
            .await
            .unwrap();

        let duplicate = sqlx::query("INSERT INTO votes (user_id, work_id) VALUES (1, 1)")
            .execute(&pool)
            .await;
        assert!(duplicate.is_err(), "duplicate vote should violate UNIQUE");
    }

    #[tokio::test]
    async fn test_deleting_work_cascades_votes() {
        let pool = create_test_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        sqlx::query("INSERT INTO users (username, password_hash) VALUES ('grace', 'hash')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO works (title, category) VALUES ('Test', 'album')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO votes (user_id, work_id) VALUES (1, 1)")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM works WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let votes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(votes, 0);
    }
}
