use crate::{
    abstract_trait::health::DynStoreHealth, domain::response::health::HealthResponse,
    state::AppState,
};
use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse, routing::get};
use std::sync::Arc;
use tracing::warn;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::new("healthy", "Order service is running"))
}

#[utoipa::path(
    get,
    path = "/status",
    tag = "Health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn store_status(Extension(health): Extension<DynStoreHealth>) -> impl IntoResponse {
    match health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse::new("ready", "All services operational")),
        ),
        Err(err) => {
            warn!("⚠️ Status check failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::new(
                    "limited",
                    "Database connection unavailable",
                )),
            )
        }
    }
}

pub fn health_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/health", get(health_check))
        .route("/status", get(store_status))
        .layer(Extension(app_state.di_container.health.clone()))
}
