//! API route handlers
//!
//! Request handling logic for the telemetry/control endpoints. Every
//! handler takes the engine lock once, so a tick and a command are never
//! interleaved: a control write cannot be lost to a concurrently advancing
//! tick and the cursor advances exactly once per poll.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::engine::SimulationEngine;
use crate::types::{AnomalyCommand, ControlCommand};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers.
#[derive(Clone)]
pub struct DashboardState {
    /// The simulation engine behind its single critical section.
    pub engine: Arc<Mutex<SimulationEngine>>,
    /// Server start time for the status endpoint.
    pub started_at: Instant,
}

impl DashboardState {
    /// Wrap an engine for sharing across request handlers.
    pub fn new(engine: SimulationEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            started_at: Instant::now(),
        }
    }
}

// ============================================================================
// Telemetry Endpoint
// ============================================================================

/// GET /api/v1/process-data — run one simulation tick.
///
/// Each poll advances the replay cursor exactly once and returns the
/// composed snapshot.
pub async fn get_process_data(State(state): State<DashboardState>) -> Response {
    let snapshot = state.engine.lock().await.tick();
    ApiResponse::ok(snapshot)
}

// ============================================================================
// Control Endpoint
// ============================================================================

/// Result of a setpoint command.
#[derive(Debug, Serialize)]
pub struct ControlResponse {
    /// The applied setpoint after clamping (RPM)
    pub effective_rpm: f64,
}

/// POST /api/v1/control — apply an operator impeller setpoint.
///
/// Values outside the configured bounds are clamped, never rejected; only a
/// non-finite number is a bad request.
pub async fn post_control(
    State(state): State<DashboardState>,
    Json(command): Json<ControlCommand>,
) -> Response {
    if !command.rpm.is_finite() {
        return ApiErrorResponse::bad_request("rpm must be a finite number");
    }
    let effective_rpm = state.engine.lock().await.apply_control(command);
    ApiResponse::ok(ControlResponse { effective_rpm })
}

// ============================================================================
// Anomaly Endpoint
// ============================================================================

/// Manual anomaly request body.
#[derive(Debug, Deserialize)]
pub struct AnomalyRequest {
    pub command: AnomalyCommand,
}

/// Result of an anomaly command.
#[derive(Debug, Serialize)]
pub struct AnomalyResponse {
    /// Manual flag state after the command
    pub manual_anomaly_active: bool,
}

/// POST /api/v1/anomaly — trigger or reset the manual anomaly flag.
///
/// Idempotent in both directions. A reset does not suppress automatic
/// detection: if the process is still out of spec, the next snapshot still
/// reports an anomaly.
pub async fn post_anomaly(
    State(state): State<DashboardState>,
    Json(request): Json<AnomalyRequest>,
) -> Response {
    let mut engine = state.engine.lock().await;
    engine.apply_anomaly(request.command);
    ApiResponse::ok(AnomalyResponse {
        manual_anomaly_active: engine.state().manual_anomaly_active,
    })
}

// ============================================================================
// Status Endpoint
// ============================================================================

/// System status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Server uptime in seconds
    pub uptime_secs: u64,
    /// Current batch, e.g. `B2026-001`
    pub batch_id: String,
    /// Replay cursor position
    pub cursor: usize,
    /// Total rows in the historical dataset
    pub dataset_rows: usize,
    /// Ticks served since startup
    pub ticks: u64,
    /// Whether the pilot corrected the setpoint on the latest tick
    pub ai_pilot_active: bool,
    /// Manual anomaly flag state
    pub manual_anomaly_active: bool,
    /// Operator/pilot setpoint override, if any (RPM)
    pub manual_rpm_override: Option<f64>,
}

/// GET /api/v1/status — replay and control state without advancing the tick.
pub async fn get_status(State(state): State<DashboardState>) -> Response {
    let engine = state.engine.lock().await;
    let sim = engine.state();
    ApiResponse::ok(StatusResponse {
        uptime_secs: state.started_at.elapsed().as_secs(),
        batch_id: sim.batch_id.to_string(),
        cursor: sim.cursor,
        dataset_rows: engine.dataset().len(),
        ticks: sim.tick_count,
        ai_pilot_active: sim.ai_pilot_active,
        manual_anomaly_active: sim.manual_anomaly_active,
        manual_rpm_override: sim.manual_rpm_override,
    })
}

// ============================================================================
// Report Export
// ============================================================================

/// GET /api/v1/download-report — the loaded dataset rendered as CSV.
pub async fn download_report(State(state): State<DashboardState>) -> Response {
    let csv = state.engine.lock().await.dataset().to_csv();
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"bioprocess_batch_report.csv\"",
            ),
        ],
        csv,
    )
        .into_response()
}

// ============================================================================
// Liveness
// ============================================================================

/// GET /health — legacy liveness probe.
pub async fn legacy_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
