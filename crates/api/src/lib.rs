pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Tenant routes
    let tenant_routes = Router::new()
        .route("/", get(routes::tenant::list))
        .route("/", post(routes::tenant::create))
        .route("/{tenant_id}", get(routes::tenant::get));

    // Invoice routes (under tenant)
    let invoice_routes = Router::new()
        .route("/", get(routes::invoice::list))
        .route("/", post(routes::invoice::create));

    // Notification routes (under tenant)
    let notification_routes = Router::new()
        .route("/", get(routes::notification::list))
        .route("/stats", get(routes::notification::stats))
        .route("/forecast", get(routes::notification::forecast))
        .route("/run", post(routes::notification::run))
        .route("/retry-failed", post(routes::notification::retry_failed))
        .route("/{entry_id}/cancel", post(routes::notification::cancel))
        .route("/config", get(routes::notification_config::get))
        .route("/config", put(routes::notification_config::update));

    Router::new()
        .route("/api/health", get(routes::health::health))
        .nest("/api/tenant", tenant_routes)
        .nest("/api/tenant/{tenant_id}/invoice", invoice_routes)
        .nest(
            "/api/tenant/{tenant_id}/notification",
            notification_routes,
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
