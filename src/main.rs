use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{delete, get, post};
use axum::Router;
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use storykeep_api::config::{self, DEV_JWT_SECRET};
use storykeep_api::database::Database;
use storykeep_api::handlers::{protected, public};
use storykeep_api::{is_development, is_production, middleware};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Storykeep API in {:?} mode", config.environment);

    if is_production!() && config.security.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("JWT_SECRET is unset; sessions are signed with the built-in dev secret");
    }

    // Development convenience only; deployments run `storykeep db migrate`.
    if is_development!() {
        if let Err(e) = Database::migrate().await {
            tracing::warn!("Skipping automatic migrations: {}", e);
        }
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("STORYKEEP_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Storykeep API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected: everything under /api/* requires the session cookie
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config::config().api.request_timeout_secs,
        )))
}

fn public_routes() -> Router {
    use public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
        .route("/auth/logout", post(auth::logout_post))
}

fn api_routes() -> Router {
    use protected::{auth, books, codex, series};

    Router::new()
        // Session and account
        .route("/api/auth/whoami", get(auth::whoami_get))
        .route("/api/auth/account", delete(auth::account_delete))
        // Records the caller owns directly
        .route(
            "/api/series",
            get(series::series_list).post(series::series_create),
        )
        .route(
            "/api/series/:id",
            get(series::series_get)
                .patch(series::series_update)
                .delete(series::series_delete),
        )
        .route("/api/books", get(books::book_list).post(books::book_create))
        .route(
            "/api/books/:id",
            get(books::book_get)
                .patch(books::book_update)
                .delete(books::book_delete),
        )
        // Worldbuilding records, reached through series/book ownership
        .route(
            "/api/codex/:kind",
            get(codex::codex_list).post(codex::codex_create),
        )
        .route(
            "/api/codex/:kind/:id",
            get(codex::codex_get)
                .patch(codex::codex_update)
                .delete(codex::codex_delete),
        )
        .route_layer(axum::middleware::from_fn(middleware::authenticate))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Storykeep API",
            "version": version,
            "description": "Content management for fiction series, books and worldbuilding codex",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/auth/register, /auth/login, /auth/logout (public - session setup)",
                "account": "/api/auth/whoami, /api/auth/account (protected)",
                "series": "/api/series[/:id] (protected)",
                "books": "/api/books[/:id] (protected)",
                "codex": "/api/codex/:kind[/:id] (protected - ?seriesId= / ?bookId= pick the scope)",
            }
        }
    }))
}

async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match Database::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
