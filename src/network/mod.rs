//! Network layer - monitoring API calls over HTTP
//!
//! The Network actor receives API commands and sends back replies.

pub mod actor;
pub mod api;
pub mod client;

pub use actor::NetworkActor;
pub use api::{ApiCall, ApiReply};
pub use client::ApiClient;
