//! Media Ranker - a small catalog and ranking service

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use media_ranker::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxSessionRepository, SqlxUserRepository, SqlxVoteRepository, SqlxWorkRepository,
        },
    },
    services::{user::UserService, vote::VoteService, work::WorkService},
};

/// Fixture users inserted on first start (username, password)
const SEED_USERS: &[(&str, &str)] = &[
    ("grace", "hopper123"),
    ("ada", "lovelace123"),
    ("katherine", "johnson123"),
];

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_ranker=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Media Ranker service...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let work_repo = SqlxWorkRepository::boxed(pool.clone());
    let vote_repo = SqlxVoteRepository::boxed(pool.clone());

    // Initialize services
    let user_service = Arc::new(UserService::new(user_repo, session_repo));
    let work_service = Arc::new(WorkService::new(work_repo.clone()));
    let vote_service = Arc::new(VoteService::new(vote_repo, work_repo));

    // Users are provisioned out of band: seed fixtures on an empty table
    let seeded = user_service.seed_users(SEED_USERS).await?;
    if seeded > 0 {
        tracing::info!("Seeded {} fixture user(s)", seeded);
    }

    // Build application state
    let state = AppState {
        user_service,
        work_service,
        vote_service,
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
