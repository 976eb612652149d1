//! App layer - central state management and command processing
//!
//! The App actor receives UI events, network responses and monitoring
//! snapshots, updates state, and emits network commands and render state.

pub mod state;
pub mod actor;
pub mod commands;
pub mod form;
pub mod settings;

pub use state::AppState;
pub use actor::AppActor;
