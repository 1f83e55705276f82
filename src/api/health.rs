use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use tracing::error;

use crate::api::state::AppState;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn probe(state: &AppState, up: &str, down: &str) -> HttpResponse {
    match state.backend().health().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: up.to_string(),
            backend: "reachable".to_string(),
            error: None,
        }),
        Err(e) => {
            error!("{} check failed: {}", up, e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: down.to_string(),
                backend: "unreachable".to_string(),
                error: Some(format!("Backend error: {}", e)),
            })
        }
    }
}

/// Health check endpoint
///
/// General health check including backend reachability.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    probe(&state, "healthy", "unhealthy").await
}

/// Readiness check endpoint
///
/// Returns 503 while the auth/data backend is unavailable; recovers on its own
/// once the backend answers again.
#[get("/ready")]
async fn readiness_check(state: web::Data<AppState>) -> impl Responder {
    probe(&state, "ready", "not_ready").await
}

/// Liveness check endpoint
///
/// Simple check that the process is alive. Does not check dependencies.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        backend: "not_checked".to_string(),
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
