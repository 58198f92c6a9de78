//! Vote service
//!
//! Implements the upvote state machine: each (user, work) pair moves from
//! unvoted to voted exactly once. A repeat upvote is rejected without
//! mutating state.

use crate::db::repositories::{VoteRepository, WorkRepository};
use crate::models::Vote;
use anyhow::Context;
use std::sync::Arc;

/// Error types for vote service operations
#[derive(Debug, thiserror::Error)]
pub enum VoteServiceError {
    /// No work exists with the given id
    #[error("Work not found: {0}")]
    WorkNotFound(i64),

    /// The user has already voted for this work
    #[error("Could not upvote")]
    AlreadyVoted,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Vote service for upvoting works
pub struct VoteService {
    vote_repo: Arc<dyn VoteRepository>,
    work_repo: Arc<dyn WorkRepository>,
}

impl VoteService {
    /// Create a new vote service
    pub fn new(vote_repo: Arc<dyn VoteRepository>, work_repo: Arc<dyn WorkRepository>) -> Self {
        Self {
            vote_repo,
            work_repo,
        }
    }

    /// Record an upvote for the (user, work) pair.
    ///
    /// The uniqueness constraint decides the outcome: a duplicate insert
    /// affects zero rows and surfaces as `AlreadyVoted`, so concurrent
    /// attempts cannot double-count.
    pub async fn upvote(&self, user_id: i64, work_id: i64) -> Result<(), VoteServiceError> {
        if self
            .work_repo
            .get_by_id(work_id)
            .await
            .context("Failed to get work")?
            .is_none()
        {
            return Err(VoteServiceError::WorkNotFound(work_id));
        }

        let inserted = self
            .vote_repo
            .add_vote(user_id, work_id)
            .await
            .context("Failed to add vote")?;

        if !inserted {
            return Err(VoteServiceError::AlreadyVoted);
        }

        Ok(())
    }

    /// Count votes for a work
    pub async fn count_for_work(&self, work_id: i64) -> Result<i64, VoteServiceError> {
        let count = self
            .vote_repo
            .count_for_work(work_id)
            .await
            .context("Failed to count votes")?;

        Ok(count)
    }

    /// List the votes cast for a work, newest first
    pub async fn votes_for_work(&self, work_id: i64) -> Result<Vec<Vote>, VoteServiceError> {
        let votes = self
            .vote_repo
            .list_for_work(work_id)
            .await
            .context("Failed to list votes")?;

        Ok(votes)
    }
}
