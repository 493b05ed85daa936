//! The JSON envelope every endpoint answers with.

use actix_web::HttpResponse;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// `{"success": true, "timestamp": ..., ...payload}`.
#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub timestamp: String,
    #[serde(flatten)]
    pub payload: T,
}

/// `{"success": false, "error": ..., "path"?: ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> ErrorBody {
        ErrorBody {
            success: false,
            error: error.into(),
            path: None,
        }
    }
}

/// Current time in the `2024-01-01T00:00:00.000Z` form.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `200 OK` with `payload` wrapped in a success envelope.
pub fn ok<T: Serialize>(payload: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope {
        success: true,
        timestamp: now_timestamp(),
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_flattens_payload() {
        let value = serde_json::to_value(Envelope {
            success: true,
            timestamp: "t".to_string(),
            payload: json!({ "count": 2 }),
        })
        .unwrap();
        assert_eq!(value, json!({ "success": true, "timestamp": "t", "count": 2 }));
    }

    #[test]
    fn timestamp_format() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
    }

    #[test]
    fn error_body_omits_missing_path() {
        let value = serde_json::to_value(ErrorBody::new("Quote not found")).unwrap();
        assert_eq!(value, json!({ "success": false, "error": "Quote not found" }));
    }
}
