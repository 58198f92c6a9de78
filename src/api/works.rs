//! Works API endpoints
//!
//! The catalog route table:
//! - GET / - home page (spotlight + top works per category), public
//! - GET /works - work listing
//! - GET /works/new - creation form metadata
//! - POST /works - create a work
//! - GET /works/{id} - work detail
//! - GET /works/{id}/edit - edit form metadata
//! - PATCH /works/{id} - update a work
//! - DELETE /works/{id} - delete a work
//! - POST /works/{id}/upvote - upvote a work
//!
//! Every route except the home page requires a logged-in user; guests get a
//! flash redirect rather than a bare 401. On the per-work routes the id is
//! resolved before the login check, so a missing id is a 404 for guests and
//! users alike.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState, MaybeUser};
use crate::api::responses::{
    Flash, FlashRedirect, HomePageResponse, WorkFormResponse, WorkListResponse, WorkResponse,
};
use crate::models::{WorkInput, CATEGORIES};
use crate::services::{VoteServiceError, WorkServiceError};

/// Build the works router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/new", get(new_form))
        .route("/{id}", get(show).patch(update).delete(destroy))
        .route("/{id}/edit", get(edit))
        .route("/{id}/upvote", post(upvote))
}

fn categories() -> Vec<String> {
    CATEGORIES.iter().map(|c| c.to_string()).collect()
}

fn validation_error(errors: Vec<crate::models::FieldError>) -> ApiError {
    ApiError::with_details(
        "VALIDATION_ERROR",
        "Work is invalid",
        serde_json::json!({ "errors": errors }),
    )
}

/// GET / - Home page
///
/// Always succeeds, for guests and logged-in users alike, whatever the
/// catalog shape (all categories present, some absent, or empty).
pub async fn home(State(state): State<AppState>) -> Result<Json<HomePageResponse>, ApiError> {
    let home = state
        .work_service
        .home_page()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(HomePageResponse {
        spotlight: home.spotlight.map(Into::into),
        albums: home.albums.into_iter().map(Into::into).collect(),
        books: home.books.into_iter().map(Into::into).collect(),
        movies: home.movies.into_iter().map(Into::into).collect(),
    }))
}

/// GET /works - Work listing
async fn index(State(state): State<AppState>, user: MaybeUser) -> Result<Response, ApiError> {
    if user.0.is_none() {
        return Ok(FlashRedirect::to_root(Flash::failure(
            "Must be logged in to view the work list.",
        ))
        .into_response());
    }

    let works = state
        .work_service
        .list()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let total = works.len() as i64;
    let works: Vec<WorkResponse> = works.into_iter().map(Into::into).collect();

    Ok(Json(WorkListResponse { works, total }).into_response())
}

/// GET /works/new - Creation form metadata
async fn new_form(user: MaybeUser) -> Result<Response, ApiError> {
    if user.0.is_none() {
        return Ok(FlashRedirect::to_root(Flash::failure(
            "Must be logged in to add a work.",
        ))
        .into_response());
    }

    Ok(Json(WorkFormResponse {
        categories: categories(),
        work: None,
    })
    .into_response())
}

/// POST /works - Create a work
///
/// Guests are redirected without any persistence change, even when the
/// payload would otherwise be valid.
async fn create(
    State(state): State<AppState>,
    user: MaybeUser,
    Json(input): Json<WorkInput>,
) -> Result<Response, ApiError> {
    if user.0.is_none() {
        return Ok(FlashRedirect::to_root(Flash::failure(
            "Must be logged in to create a work.",
        ))
        .into_response());
    }

    let work = state.work_service.create(input).await.map_err(|e| match e {
        WorkServiceError::ValidationFailed(errors) => validation_error(errors),
        _ => ApiError::internal_error(e.to_string()),
    })?;

    let flash = Flash::success(format!("Successfully created {} {}", work.category, work.title));
    Ok(FlashRedirect::to_work(work.id, flash).into_response())
}

/// GET /works/{id} - Work detail
async fn show(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let work = state
        .work_service
        .get_with_votes(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Work not found: {}", id)))?;

    if user.0.is_none() {
        return Ok(FlashRedirect::to_root(Flash::failure(
            "Must be logged in to view page.",
        ))
        .into_response());
    }

    Ok(Json(WorkResponse::from(work)).into_response())
}

/// GET /works/{id}/edit - Edit form metadata
async fn edit(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let work = state
        .work_service
        .get_with_votes(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Work not found: {}", id)))?;

    if user.0.is_none() {
        return Ok(FlashRedirect::to_root(Flash::failure(
            "Must be logged in to edit work.",
        ))
        .into_response());
    }

    Ok(Json(WorkFormResponse {
        categories: categories(),
        work: Some(work.into()),
    })
    .into_response())
}

/// PATCH /works/{id} - Update a work
async fn update(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<i64>,
    Json(input): Json<WorkInput>,
) -> Result<Response, ApiError> {
    if state
        .work_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .is_none()
    {
        return Err(ApiError::not_found(format!("Work not found: {}", id)));
    }

    if user.0.is_none() {
        return Ok(FlashRedirect::to_root(Flash::failure(
            "Must be logged in to update work.",
        ))
        .into_response());
    }

    let work = state
        .work_service
        .update(id, input)
        .await
        .map_err(|e| match e {
            WorkServiceError::NotFound(_) => {
                ApiError::not_found(format!("Work not found: {}", id))
            }
            WorkServiceError::ValidationFailed(errors) => validation_error(errors),
            _ => ApiError::internal_error(e.to_string()),
        })?;

    let flash = Flash::success(format!("Successfully updated {} {}", work.category, work.title));
    Ok(FlashRedirect::to_work(work.id, flash).into_response())
}

/// DELETE /works/{id} - Delete a work
async fn destroy(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let work = state
        .work_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Work not found: {}", id)))?;

    if user.0.is_none() {
        return Ok(FlashRedirect::to_root(Flash::failure(
            "Must be logged in to delete a work.",
        ))
        .into_response());
    }

    state.work_service.delete(id).await.map_err(|e| match e {
        WorkServiceError::NotFound(_) => ApiError::not_found(format!("Work not found: {}", id)),
        _ => ApiError::internal_error(e.to_string()),
    })?;

    let flash = Flash::success(format!(
        "Successfully destroyed {} {}",
        work.category, work.title
    ));
    Ok(FlashRedirect::to_root(flash).into_response())
}

/// POST /works/{id}/upvote - Upvote a work
///
/// Both failure modes redirect back to the work's detail page: guests with
/// a login prompt, repeat voters with "Could not upvote".
async fn upvote(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    if state
        .work_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .is_none()
    {
        return Err(ApiError::not_found(format!("Work not found: {}", id)));
    }

    let user = match user.0 {
        Some(user) => user,
        None => {
            return Ok(FlashRedirect::to_work(
                id,
                Flash::failure("You must log in to do that"),
            )
            .into_response());
        }
    };

    match state.vote_service.upvote(user.id, id).await {
        Ok(()) => {
            Ok(FlashRedirect::to_work(id, Flash::success("Successfully upvoted!")).into_response())
        }
        Err(VoteServiceError::AlreadyVoted) => {
            Ok(FlashRedirect::to_work(id, Flash::failure("Could not upvote")).into_response())
        }
        Err(VoteServiceError::WorkNotFound(_)) => {
            Err(ApiError::not_found(format!("Work not found: {}", id)))
        }
        Err(e) => Err(ApiError::internal_error(e.to_string())),
    }
}
