/// Health check endpoints for liveness and readiness probes
use crate::{context::AppContext, db};
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};

/// Health status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "healthy" or "unhealthy"
    pub status: String,

    /// Application version
    pub version: String,

    /// Optional error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(liveness_probe))
        .route("/health/ready", get(readiness_probe))
}

/// Liveness probe
pub async fn liveness_probe() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: None,
    })
}

/// Readiness probe - the identity database must answer
pub async fn readiness_probe(State(ctx): State<AppContext>) -> (StatusCode, Json<HealthStatus>) {
    match db::test_connection(&ctx.identity_db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "healthy".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                message: None,
            }),
        ),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "unhealthy".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    message: Some("Database unavailable".to_string()),
                }),
            )
        }
    }
}
