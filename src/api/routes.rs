//! API route definitions
//!
//! Organizes endpoints for the bioprocess dashboard:
//! - /api/v1/process-data - one simulation tick per poll
//! - /api/v1/control - operator impeller setpoint
//! - /api/v1/anomaly - manual anomaly trigger/reset
//! - /api/v1/status - replay and control state
//! - /api/v1/download-report - dataset CSV export

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard.
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/process-data", get(handlers::get_process_data))
        .route("/control", post(handlers::post_control))
        .route("/anomaly", post(handlers::post_anomaly))
        .route("/status", get(handlers::get_status))
        .route("/download-report", get(handlers::download_report))
        .with_state(state)
}

/// Legacy health endpoint at root level.
pub fn legacy_routes() -> Router {
    Router::new().route("/health", get(handlers::legacy_health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::engine::{EngineParams, SimulationEngine};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn create_test_state() -> DashboardState {
        let dataset = Dataset::synthetic(32).unwrap();
        DashboardState::new(SimulationEngine::new(dataset, EngineParams::default()))
    }

    #[tokio::test]
    async fn test_api_routes_process_data() {
        let app = api_routes(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/process-data")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_routes_status() {
        let app = api_routes(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_routes_control_accepts_json() {
        let app = api_routes(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/control")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"rpm": 300.0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_routes_download_report() {
        let app = api_routes(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/download-report")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/csv"));
    }
}
