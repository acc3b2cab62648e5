use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the ledger answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub ledger: LedgerHealth,
}

#[derive(Serialize)]
pub struct LedgerHealth {
    pub reachable: bool,
    /// Round trip of the store's health probe.
    pub latency_ms: u128,
}

/// GET /health
///
/// Answers 503 when the ledger store is unreachable so load balancers stop
/// routing settlements to this instance.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let probe = state.store.health_check().await;
    let latency_ms = started.elapsed().as_millis();

    if let Err(err) = &probe {
        tracing::warn!(error = %err, "Ledger store health check failed");
    }

    let reachable = probe.is_ok();
    let (code, status) = if reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        ledger: LedgerHealth {
            reachable,
            latency_ms,
        },
    };
    (code, Json(body))
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
