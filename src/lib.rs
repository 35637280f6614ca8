//! biotwin: Bioreactor Digital-Twin Simulation & Control
//!
//! Replays historical bioreactor telemetry as a live stream, derives batch
//! quality metrics, detects and injects process anomalies, projects
//! near-future temperature via a sliding-window model, and runs a
//! closed-loop controller on the impeller setpoint.
//!
//! ## Architecture
//!
//! - **Dataset**: immutable historical process rows (CSV or synthetic)
//! - **Engine**: replay cursor, batch rollover, tick orchestration
//! - **Model**: pure physics/health calculations
//! - **Twin**: sliding-window temperature projection
//! - **Pilot**: automatic impeller RPM correction

pub mod api;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod model;
pub mod pilot;
pub mod twin;
pub mod types;

// Re-export configuration
pub use config::ProcessConfig;

// Re-export commonly used types
pub use types::{AnomalyCommand, BatchId, ControlCommand, ProcessRow, TelemetrySnapshot};

// Re-export the engine and dataset entry points
pub use dataset::{Dataset, DatasetError};
pub use engine::{EngineParams, SimulationEngine};
