//! Work service
//!
//! Implements catalog business logic: validated create/update, lookup,
//! listings with derived vote counts, and the home page aggregation
//! (spotlight plus top works per category).

use crate::db::repositories::WorkRepository;
use crate::models::{Category, FieldError, Work, WorkInput, WorkWithVotes};
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;

/// How many works each home page category section shows
const TOP_WORKS_PER_CATEGORY: i64 = 10;

/// Error types for work service operations
#[derive(Debug, thiserror::Error)]
pub enum WorkServiceError {
    /// No work exists with the given id
    #[error("Work not found: {0}")]
    NotFound(i64),

    /// Input failed validation; carries the per-field errors
    #[error("Validation failed")]
    ValidationFailed(Vec<FieldError>),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Home page aggregation: the highest-voted work plus the top works in each
/// category.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub spotlight: Option<WorkWithVotes>,
    pub albums: Vec<WorkWithVotes>,
    pub books: Vec<WorkWithVotes>,
    pub movies: Vec<WorkWithVotes>,
}

/// Work service for catalog management
pub struct WorkService {
    work_repo: Arc<dyn WorkRepository>,
}

impl WorkService {
    /// Create a new work service
    pub fn new(work_repo: Arc<dyn WorkRepository>) -> Self {
        Self { work_repo }
    }

    /// Create a work from validated input.
    ///
    /// Returns `ValidationFailed` with field errors when the input is
    /// invalid; nothing is persisted in that case.
    pub async fn create(&self, input: WorkInput) -> Result<Work, WorkServiceError> {
        let (title, category) = input
            .validate()
            .map_err(WorkServiceError::ValidationFailed)?;

        let work = self
            .work_repo
            .create(
                &title,
                category,
                input.creator.as_deref(),
                input.publication_year,
                input.description.as_deref(),
            )
            .await
            .context("Failed to create work")?;

        Ok(work)
    }

    /// Get a work by id
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Work>, WorkServiceError> {
        let work = self
            .work_repo
            .get_by_id(id)
            .await
            .context("Failed to get work")?;

        Ok(work)
    }

    /// Get a work by id with its vote count
    pub async fn get_with_votes(&self, id: i64) -> Result<Option<WorkWithVotes>, WorkServiceError> {
        let work = self
            .work_repo
            .get_with_votes(id)
            .await
            .context("Failed to get work with votes")?;

        Ok(work)
    }

    /// List all works with vote counts, highest-voted first
    pub async fn list(&self) -> Result<Vec<WorkWithVotes>, WorkServiceError> {
        let works = self
            .work_repo
            .list_with_votes()
            .await
            .context("Failed to list works")?;

        Ok(works)
    }

    /// Update a work from validated input.
    ///
    /// The existence check runs before validation, so a bogus id reports
    /// `NotFound` even when the payload is also invalid. Invalid input
    /// leaves the stored row untouched.
    pub async fn update(&self, id: i64, input: WorkInput) -> Result<Work, WorkServiceError> {
        if self
            .work_repo
            .get_by_id(id)
            .await
            .context("Failed to get work")?
            .is_none()
        {
            return Err(WorkServiceError::NotFound(id));
        }

        let (title, category) = input
            .validate()
            .map_err(WorkServiceError::ValidationFailed)?;

        let updated = self
            .work_repo
            .update(
                id,
                &title,
                category,
                input.creator.as_deref(),
                input.publication_year,
                input.description.as_deref(),
            )
            .await
            .context("Failed to update work")?;

        if !updated {
            return Err(WorkServiceError::NotFound(id));
        }

        let work = self
            .work_repo
            .get_by_id(id)
            .await
            .context("Failed to reload work")?
            .ok_or(WorkServiceError::NotFound(id))?;

        Ok(work)
    }

    /// Delete a work by id
    pub async fn delete(&self, id: i64) -> Result<(), WorkServiceError> {
        let deleted = self
            .work_repo
            .delete(id)
            .await
            .context("Failed to delete work")?;

        if !deleted {
            return Err(WorkServiceError::NotFound(id));
        }

        Ok(())
    }

    /// Build the home page aggregation.
    ///
    /// Succeeds for any catalog shape: all categories populated, some
    /// empty, or no works at all (spotlight absent, all sections empty).
    pub async fn home_page(&self) -> Result<HomePage, WorkServiceError> {
        let spotlight = self
            .work_repo
            .spotlight()
            .await
            .context("Failed to get spotlight")?;

        let albums = self
            .work_repo
            .top_in_category(Category::Album, TOP_WORKS_PER_CATEGORY)
            .await
            .context("Failed to list top albums")?;
        let books = self
            .work_repo
            .top_in_category(Category::Book, TOP_WORKS_PER_CATEGORY)
            .await
            .context("Failed to list top books")?;
        let movies = self
            .work_repo
            .top_in_category(Category::Movie, TOP_WORKS_PER_CATEGORY)
            .await
            .context("Failed to list top movies")?;

        Ok(HomePage {
            spotlight,
            albums,
            books,
            movies,
        })
    }

    /// Count all works
    pub async fn count(&self) -> Result<i64, WorkServiceError> {
        let count = self.work_repo.count().await.context("Failed to count works")?;
        Ok(count)
    }
}
