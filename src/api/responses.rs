//! Shared API response types
//!
//! Flash messaging and the response payloads used across endpoints.
//!
//! Flash is a one-shot message: it travels in the body of the redirect
//! response that carries it, beside the `Location` header, so there is no
//! server-side flash state to clear.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::{Work, WorkWithVotes};

/// Flash outcome marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashStatus {
    Success,
    Failure,
}

/// One-shot message shown to the user alongside a redirect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub status: FlashStatus,
    pub result_text: String,
}

impl Flash {
    pub fn success(result_text: impl Into<String>) -> Self {
        Self {
            status: FlashStatus::Success,
            result_text: result_text.into(),
        }
    }

    pub fn failure(result_text: impl Into<String>) -> Self {
        Self {
            status: FlashStatus::Failure,
            result_text: result_text.into(),
        }
    }
}

/// A 303 redirect carrying a flash payload in its body.
///
/// 303 makes clients re-request the target with GET after a POST, PATCH,
/// or DELETE.
#[derive(Debug)]
pub struct FlashRedirect {
    pub location: String,
    pub flash: Flash,
}

impl FlashRedirect {
    pub fn to(location: impl Into<String>, flash: Flash) -> Self {
        Self {
            location: location.into(),
            flash,
        }
    }

    /// Redirect to the root page
    pub fn to_root(flash: Flash) -> Self {
        Self::to("/", flash)
    }

    /// Redirect to a work's detail page
    pub fn to_work(work_id: i64, flash: Flash) -> Self {
        Self::to(format!("/works/{}", work_id), flash)
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::SEE_OTHER, Json(self.flash)).into_response();
        match HeaderValue::from_str(&self.location) {
            Ok(value) => {
                response.headers_mut().insert(header::LOCATION, value);
                response
            }
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Response for a single work
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkResponse {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub creator: Option<String>,
    pub publication_year: Option<i32>,
    pub description: Option<String>,
    pub vote_count: i64,
    pub created_at: String,
}

impl From<WorkWithVotes> for WorkResponse {
    fn from(w: WorkWithVotes) -> Self {
        Self {
            id: w.work.id,
            title: w.work.title,
            category: w.work.category.to_string(),
            creator: w.work.creator,
            publication_year: w.work.publication_year,
            description: w.work.description,
            vote_count: w.vote_count,
            created_at: w.work.created_at.to_rfc3339(),
        }
    }
}

impl From<Work> for WorkResponse {
    fn from(work: Work) -> Self {
        Self::from(WorkWithVotes {
            work,
            vote_count: 0,
        })
    }
}

/// Response for the work listing
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkListResponse {
    pub works: Vec<WorkResponse>,
    pub total: i64,
}

/// Response for the home page
#[derive(Debug, Serialize, Deserialize)]
pub struct HomePageResponse {
    pub spotlight: Option<WorkResponse>,
    pub albums: Vec<WorkResponse>,
    pub books: Vec<WorkResponse>,
    pub movies: Vec<WorkResponse>,
}

/// Form metadata for the new/edit pages
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkFormResponse {
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work: Option<WorkResponse>,
}
