/**
 * Service Route Handlers
 *
 * This module defines the service endpoints:
 *
 * - `GET /` - Service banner
 * - `GET /api/health` - Health check including the database
 */

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backend::server::state::AppState;

/// Response body of `GET /`
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

/// Response body of `GET /api/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: &'static str,
    /// `connected`, `disconnected` or `in-memory`
    pub database: &'static str,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Configure service routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with service routes configured
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/", get(root))
        .route("/api/health", get(health_check))
}

/// Service banner
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Stream chat API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check
///
/// Pings the database when one is configured. Without a database the
/// service runs on in-memory collaborators and reports itself healthy.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let timestamp = Utc::now();

    let Some(pool) = &state.db_pool else {
        return Json(HealthResponse {
            status: "healthy",
            database: "in-memory",
            timestamp,
            error: None,
        });
    };

    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => Json(HealthResponse {
            status: "healthy",
            database: "connected",
            timestamp,
            error: None,
        }),
        Err(e) => {
            tracing::error!("[Server] Health check failed: {}", e);
            Json(HealthResponse {
                status: "unhealthy",
                database: "disconnected",
                timestamp,
                error: Some("database ping failed".to_string()),
            })
        }
    }
}
