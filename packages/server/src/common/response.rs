//! Uniform API response envelope.
//!
//! Every endpoint answers `{"success": true, "data": ...}` or
//! `{"success": false, "message": "..."}` so the dashboard has a single
//! unwrapping path.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_envelope_omits_message() {
        let body = serde_json::to_value(ApiResponse::ok(json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"success": true, "data": {"id": 1}}));
    }

    #[test]
    fn error_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::<()>::error("Record not found")).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": "Record not found"})
        );
    }
}
