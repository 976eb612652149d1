//! Wire model of the monitoring API
//!
//! Every endpoint is one [`ApiCall`] variant. All calls answer with a JSON
//! envelope whose `status` must equal `"success"`; anything else, including
//! a body that is not JSON, is a failure.

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::models::{Responses, SignupForm};

/// HTTP methods used by the API
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
        }
    }
}

/// A single request to the monitoring API, with every parameter resolved
#[derive(Clone, Debug, PartialEq)]
pub enum ApiCall {
    Login {
        username: String,
        password: String,
    },
    Signup(SignupForm),
    UpdateUserField {
        username: String,
        field_name: String,
        new_value: Value,
    },
    AddBaby {
        username: String,
        baby_name: String,
        baby_age: String,
    },
    AddBabyResponses {
        username: String,
        baby_name: String,
        responses: Responses,
    },
    RemoveBabyResponses {
        username: String,
        baby_name: String,
        response_names: Vec<String>,
    },
    StartScan {
        device_id: String,
    },
    StopScan {
        device_id: String,
    },
    GetScanStatus {
        device_id: String,
    },
    SendResponse {
        device_id: String,
        youtube_url: String,
    },
}

impl ApiCall {
    /// Short action name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            ApiCall::Login { .. } => "login",
            ApiCall::Signup(_) => "signup",
            ApiCall::UpdateUserField { .. } => "update field",
            ApiCall::AddBaby { .. } => "add baby",
            ApiCall::AddBabyResponses { .. } => "add responses",
            ApiCall::RemoveBabyResponses { .. } => "remove responses",
            ApiCall::StartScan { .. } => "start scan",
            ApiCall::StopScan { .. } => "stop scan",
            ApiCall::GetScanStatus { .. } => "get scan status",
            ApiCall::SendResponse { .. } => "send response",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            ApiCall::GetScanStatus { .. } => HttpMethod::GET,
            _ => HttpMethod::POST,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            ApiCall::Login { .. } => "/login",
            ApiCall::Signup(_) => "/signup",
            ApiCall::UpdateUserField { .. } => "/update_user_field",
            ApiCall::AddBaby { .. } => "/add_baby",
            ApiCall::AddBabyResponses { .. } => "/add_baby_responses",
            ApiCall::RemoveBabyResponses { .. } => "/remove_baby_responses",
            ApiCall::StartScan { .. } => "/start_scan",
            ApiCall::StopScan { .. } => "/stop_scan",
            ApiCall::GetScanStatus { .. } => "/get_scan_status",
            ApiCall::SendResponse { .. } => "/send_response",
        }
    }

    /// JSON body for POST calls
    pub fn body(&self) -> Option<Value> {
        let body = match self {
            ApiCall::Login { username, password } => json!({
                "username": username,
                "password": password,
            }),
            ApiCall::Signup(form) => serde_json::to_value(form).unwrap_or(Value::Null),
            ApiCall::UpdateUserField {
                username,
                field_name,
                new_value,
            } => json!({
                "username": username,
                "field_name": field_name,
                "new_value": new_value,
            }),
            ApiCall::AddBaby {
                username,
                baby_name,
                baby_age,
            } => json!({
                "username": username,
                "baby_name": baby_name,
                "baby_age": baby_age,
            }),
            ApiCall::AddBabyResponses {
                username,
                baby_name,
                responses,
            } => json!({
                "username": username,
                "baby_name": baby_name,
                "responses": responses,
            }),
            ApiCall::RemoveBabyResponses {
                username,
                baby_name,
                response_names,
            } => json!({
                "username": username,
                "baby_name": baby_name,
                "response_names": response_names,
            }),
            ApiCall::StartScan { device_id } | ApiCall::StopScan { device_id } => json!({
                "device_id": device_id,
            }),
            ApiCall::SendResponse {
                device_id,
                youtube_url,
            } => json!({
                "device_id": device_id,
                "youtube_url": youtube_url,
            }),
            ApiCall::GetScanStatus { .. } => return None,
        };
        Some(body)
    }

    /// Query parameters for GET calls
    pub fn query(&self) -> Vec<(&'static str, &str)> {
        match self {
            ApiCall::GetScanStatus { device_id } => vec![("device_id", device_id.as_str())],
            _ => Vec::new(),
        }
    }

    /// Envelope key holding the payload handed back to the caller, if any
    fn payload_key(&self) -> Option<&'static str> {
        match self {
            ApiCall::Login { .. } => Some("user_data"),
            ApiCall::GetScanStatus { .. } => Some("data"),
            _ => None,
        }
    }

    /// Judge a raw response body
    pub fn decode(&self, body: &str) -> Result<ApiReply, ApiError> {
        let envelope: Value = serde_json::from_str(body)?;
        match envelope.get("status").and_then(Value::as_str) {
            Some("success") => {
                let payload = self
                    .payload_key()
                    .and_then(|key| envelope.get(key))
                    .filter(|v| !v.is_null())
                    .cloned();
                Ok(ApiReply::Success { payload })
            }
            other => Err(ApiError::Rejected {
                status: other.unwrap_or("<missing>").to_string(),
            }),
        }
    }
}

/// Result of a call as seen by the session store
#[derive(Clone, Debug, PartialEq)]
pub enum ApiReply {
    Success { payload: Option<Value> },
    Failure,
}

impl ApiReply {
    pub fn ok() -> Self {
        ApiReply::Success { payload: None }
    }

    pub fn with_payload(payload: Value) -> Self {
        ApiReply::Success {
            payload: Some(payload),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiReply::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_status_is_the_only_get() {
        let status = ApiCall::GetScanStatus {
            device_id: "pi-42".into(),
        };
        assert_eq!(status.method(), HttpMethod::GET);
        assert_eq!(status.body(), None);
        assert_eq!(status.query(), vec![("device_id", "pi-42")]);

        let start = ApiCall::StartScan {
            device_id: "pi-42".into(),
        };
        assert_eq!(start.method(), HttpMethod::POST);
        assert_eq!(start.body(), Some(json!({ "device_id": "pi-42" })));
        assert!(start.query().is_empty());
    }

    #[test]
    fn test_update_field_body_shape() {
        let call = ApiCall::UpdateUserField {
            username: "anna".into(),
            field_name: "baby.Tommy.age".into(),
            new_value: json!("7 months"),
        };
        assert_eq!(call.path(), "/update_user_field");
        assert_eq!(
            call.body().unwrap(),
            json!({
                "username": "anna",
                "field_name": "baby.Tommy.age",
                "new_value": "7 months",
            })
        );
    }

    #[test]
    fn test_remove_responses_body_shape() {
        let call = ApiCall::RemoveBabyResponses {
            username: "anna".into(),
            baby_name: "Tommy".into(),
            response_names: vec!["Lullaby".into()],
        };
        assert_eq!(call.body().unwrap()["response_names"], json!(["Lullaby"]));
    }

    #[test]
    fn test_decode_login_payload() {
        let call = ApiCall::Login {
            username: "anna".into(),
            password: "pw".into(),
        };
        let reply = call
            .decode(r#"{"status":"success","user_data":{"username":"anna"}}"#)
            .unwrap();
        assert_eq!(reply, ApiReply::with_payload(json!({ "username": "anna" })));
    }

    #[test]
    fn test_decode_ignores_payload_for_plain_calls() {
        let call = ApiCall::StopScan {
            device_id: "pi".into(),
        };
        let reply = call.decode(r#"{"status":"success","data":{"x":1}}"#).unwrap();
        assert_eq!(reply, ApiReply::ok());
    }

    #[test]
    fn test_decode_rejections() {
        let call = ApiCall::StopScan {
            device_id: "pi".into(),
        };
        assert!(matches!(
            call.decode(r#"{"status":"error","message":"nope"}"#),
            Err(ApiError::Rejected { status }) if status == "error"
        ));
        assert!(matches!(
            call.decode(r#"["success"]"#),
            Err(ApiError::Rejected { .. })
        ));
        assert!(matches!(call.decode("<html>"), Err(ApiError::Decode(_))));
    }
}
