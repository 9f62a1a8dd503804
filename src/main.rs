//! Biblius Server - Library Management System
//!
//! A Rust REST API server for managing a lending library.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblius_server::{
    api,
    config::AppConfig,
    repository::Repository,
    scheduler::ReminderScheduler,
    services::{notifications::NotificationHub, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblius_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Biblius Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Initialize Redis connection
    let redis_service =
        biblius_server::services::redis::RedisService::new(&config.redis.url, config.cache.ttl_seconds)
            .await
            .expect("Failed to connect to Redis");

    tracing::info!("Connected to Redis");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(
        repository.clone(),
        config.auth.clone(),
        config.email.clone(),
        config.server.base_url.clone(),
        redis_service,
    )
    .await
    .expect("Failed to create services");

    let notifications = NotificationHub::new();

    // Daily reminder sweep
    ReminderScheduler::new(
        repository,
        services.email.clone(),
        notifications.clone(),
        config.scheduler.reminder_hour_utc,
    )
    .spawn();

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        notifications,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Per-IP rate limiting; the layer needs a 'static config
    let governor_config = Box::new(
        GovernorConfigBuilder::default()
            .per_second(state.config.rate_limit.per_second)
            .burst_size(state.config.rate_limit.burst_size)
            .finish()
            .expect("Invalid rate limit configuration"),
    );

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/verify-email", get(api::auth::verify_email))
        .route("/auth/me", get(api::auth::me))
        // Books (catalog)
        .route("/books", get(api::books::search_books))
        .route("/books", post(api::books::add_book))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", put(api::books::edit_book))
        .route("/books/:id", delete(api::books::delete_book))
        // Borrowing
        .route("/borrow", post(api::borrows::borrow_book))
        .route("/return", post(api::borrows::return_book))
        .route("/borrow/limit", get(api::borrows::check_limit))
        // Fines
        .route("/fines/:borrow_id", get(api::fines::calculate_fine))
        .route("/fines", get(api::fines::total_fine))
        // Payments
        .route("/payments", post(api::payments::pay_fine))
        .route("/payments/:transaction_id/invoice", get(api::payments::generate_invoice))
        // Users
        .route("/users/:id", get(api::users::get_user))
        .route("/users/:id/borrows", get(api::users::get_user_borrows))
        .route("/users/:id/account-status", put(api::users::update_account_status))
        // Analytics
        .route("/analytics/most-borrowed", get(api::analytics::most_borrowed))
        .route("/analytics/monthly-report", get(api::analytics::monthly_report))
        // Notifications
        .route("/ws", get(api::ws::notifications_ws))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(GovernorLayer {
            config: Box::leak(governor_config),
        })
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
