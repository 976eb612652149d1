use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response name -> media URL. Names are unique within a baby; inserting an
/// existing name overwrites it.
pub type Responses = BTreeMap<String, String>;

/// A baby record owned by a [`User`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Baby {
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub responses: Responses,
    /// Carried through from the server untouched; nothing reads it.
    #[serde(default)]
    pub rides: Vec<serde_json::Value>,
}

impl Baby {
    pub fn new(age: impl Into<String>) -> Self {
        Baby {
            age: age.into(),
            responses: Responses::new(),
            rides: Vec::new(),
        }
    }
}

/// The logged-in account, as returned by `/login` and persisted locally
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub device_id: String,
    /// Baby currently selected for monitoring and responses
    #[serde(default)]
    pub scanning_baby: String,
    #[serde(default)]
    pub baby: BTreeMap<String, Baby>,
}

impl User {
    /// The selected baby, if it still exists in the map
    pub fn selected_baby(&self) -> Option<(&str, &Baby)> {
        if self.scanning_baby.is_empty() {
            return None;
        }
        self.baby
            .get_key_value(&self.scanning_baby)
            .map(|(name, baby)| (name.as_str(), baby))
    }

    pub fn has_device(&self) -> bool {
        !self.device_id.trim().is_empty()
    }
}

/// Payload posted to `/signup`
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub device_id: String,
    pub scanning_baby: String,
    pub baby: BTreeMap<String, Baby>,
}

/// Scan state of the monitoring device as shown on the home screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceStatus {
    Scanning,
    Idle,
    #[default]
    Unknown,
}

impl DeviceStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "scanning" => DeviceStatus::Scanning,
            "idle" => DeviceStatus::Idle,
            _ => DeviceStatus::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviceStatus::Scanning => "Scanning",
            DeviceStatus::Idle => "Idle",
            DeviceStatus::Unknown => "Unknown",
        }
    }
}

/// `data` payload of `/get_scan_status`
#[derive(Clone, Debug, PartialEq)]
pub struct ScanStatus {
    pub status: DeviceStatus,
    pub raw: serde_json::Value,
}

impl ScanStatus {
    pub fn from_payload(raw: serde_json::Value) -> Self {
        let status = raw
            .get("status")
            .and_then(|s| s.as_str())
            .map(DeviceStatus::parse)
            .unwrap_or_default();
        ScanStatus { status, raw }
    }
}
