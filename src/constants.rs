//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the monitoring API
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5005";

/// Storage key under which the session snapshot is persisted
pub const SESSION_STORAGE_KEY: &str = "user";

/// Name of the per-user data directory under `$HOME`
pub const DATA_DIR_NAME: &str = ".babybeacon";

/// Default seconds between mock monitoring updates
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default log file name, relative to the data directory
pub const DEFAULT_LOG_FILE: &str = "babybeacon.log";

/// Application name
pub const APP_NAME: &str = "BabyBeacon";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Blurb shown on the About screen
pub const APP_DESCRIPTION: &str = "BabyBeacon is your trusted baby monitoring companion, \
providing peace of mind through advanced monitoring and soothing features.";
