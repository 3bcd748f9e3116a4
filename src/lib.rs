pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use axum::{routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Assemble the full application router. Lives in the library so the
/// integration tests can drive it in-process.
pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Protected API
        .merge(quotation_routes())
        .merge(session_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn quotation_routes() -> Router {
    use handlers::quotations::{collection, record};

    Router::new()
        .route(
            "/api/quotations",
            post(collection::collection_post).get(collection::collection_get),
        )
        .route(
            "/api/quotations/:id",
            get(record::record_get).put(record::record_put),
        )
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn session_routes() -> Router {
    use handlers::session;

    Router::new()
        .route("/api/whoami", get(session::whoami_get))
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "CRM API",
            "version": version,
            "description": "Role-scoped quotation backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "whoami": "/api/whoami (protected)",
                "quotations": "/api/quotations[/:id] (protected, role-scoped)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
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
