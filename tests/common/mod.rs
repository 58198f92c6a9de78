//! Shared test harness for the integration suites
//!
//! Builds the full router over an in-memory database, seeded with the same
//! fixture users the binary would create.

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum_test::TestServer;
use serde_json::{json, Value};

use media_ranker::api::{build_router, AppState};
use media_ranker::db::repositories::{
    SqlxSessionRepository, SqlxUserRepository, SqlxVoteRepository, SqlxWorkRepository,
};
use media_ranker::db::{create_test_pool, migrations};
use media_ranker::services::{UserService, VoteService, WorkService};

pub const SEED_USERS: &[(&str, &str)] = &[("grace", "hopper123"), ("ada", "lovelace123")];

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

/// Build a fresh application over an in-memory database
pub async fn spawn_app() -> TestApp {
    let pool = create_test_pool().await.expect("Failed to create test pool");
    migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let work_repo = SqlxWorkRepository::boxed(pool.clone());
    let vote_repo = SqlxVoteRepository::boxed(pool.clone());

    let user_service = Arc::new(UserService::new(user_repo, session_repo));
    let work_service = Arc::new(WorkService::new(work_repo.clone()));
    let vote_service = Arc::new(VoteService::new(vote_repo, work_repo));

    user_service
        .seed_users(SEED_USERS)
        .await
        .expect("Failed to seed users");

    let state = AppState {
        user_service,
        work_service,
        vote_service,
    };

    let server = TestServer::new(build_router(state.clone(), "http://localhost:3000"))
        .expect("Failed to start test server");

    TestApp { server, state }
}

impl TestApp {
    /// Log in and return the session token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .server
            .post("/login")
            .json(&json!({ "username": username, "password": password }))
            .await;
        assert_eq!(response.status_code(), 200, "login should succeed");

        let body: Value = response.json();
        body["token"].as_str().expect("token in response").to_string()
    }

    /// Log in as the first fixture user
    pub async fn login_default(&self) -> String {
        self.login(SEED_USERS[0].0, SEED_USERS[0].1).await
    }

    /// Create a work through the API, returning its id
    pub async fn create_work(&self, token: &str, title: &str, category: &str) -> i64 {
        let response = self
            .server
            .post("/works")
            .add_header(header::AUTHORIZATION, bearer(token))
            .json(&json!({ "title": title, "category": category }))
            .await;
        assert_eq!(response.status_code(), 303, "create should redirect");

        let location = response
            .headers()
            .get(header::LOCATION)
            .expect("Location header")
            .to_str()
            .unwrap()
            .to_string();
        location
            .rsplit('/')
            .next()
            .and_then(|s| s.parse().ok())
            .expect("work id in Location")
    }

    /// Current number of works
    pub async fn work_count(&self) -> i64 {
        self.state.work_service.count().await.expect("count works")
    }
}

/// Build a bearer Authorization header value
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header value")
}

/// The Location header of a redirect response, as a string
pub fn location_of(response: &axum_test::TestResponse) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}
