//! # BabyBeacon
//!
//! Terminal companion for a baby-monitoring device.
//!
//! ## Features
//! - Login / signup against the monitoring API
//! - Device scan control and status
//! - Mock live monitoring statistics
//! - Per-baby soothing responses (YouTube URLs) played on the device
//! - Profile, babies and local settings pages
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine, owns the session and the monitoring poller)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod messages;
pub mod models;
pub mod monitoring;
pub mod network;
pub mod session;
pub mod storage;
pub mod ui;
pub mod validation;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::Config;
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Baby, DeviceStatus, User};
pub use network::{ApiCall, ApiClient, ApiReply, NetworkActor};
pub use session::{Action, Outcome, Session, UserUpdate};
