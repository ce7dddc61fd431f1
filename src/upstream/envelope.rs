//! Upstream response envelope.
//!
//! Every upstream response wraps its payload:
//! ```text
//! { "data": <T>, "status": "Successfully processed request." }
//! { "status": "Failed to process request.", "error": "..." }
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::employee::error::{EmployeeError, EmployeeResult};

/// The upstream response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Surface the payload, or fail if the envelope carries none.
    pub fn into_payload(self) -> EmployeeResult<T> {
        match self.data {
            Some(data) => Ok(data),
            None => {
                let reason = self
                    .error
                    .or(self.status)
                    .unwrap_or_else(|| "envelope carries no data".to_string());
                Err(EmployeeError::upstream(None, reason))
            }
        }
    }
}

/// Decode an envelope body and unwrap its payload.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> EmployeeResult<T> {
    let envelope: Envelope<T> = serde_json::from_slice(body)
        .map_err(|e| EmployeeError::upstream(None, format!("malformed envelope: {e}")))?;
    envelope.into_payload()
}

/// Best-effort extraction of the upstream's own error text.
pub fn error_message(body: &[u8]) -> Option<String> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_slice(body).ok()?;
    envelope.error.or(envelope.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::Employee;

    #[test]
    fn test_decode_list() {
        let body = br#"{"data":[{"id":"1","employee_name":"A","employee_salary":10,"employee_age":30,"employee_title":"T","employee_email":"a@x.io"}],"status":"Successfully processed request."}"#;
        let employees: Vec<Employee> = decode_envelope(body).unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].name, "A");
    }

    #[test]
    fn test_decode_boolean() {
        let confirmed: bool = decode_envelope(br#"{"data":true,"status":"ok"}"#).unwrap();
        assert!(confirmed);
    }

    #[test]
    fn test_missing_data_is_upstream_error() {
        let err = decode_envelope::<bool>(br#"{"status":"Failed to process request.","error":"nope"}"#)
            .unwrap_err();
        match err {
            EmployeeError::Upstream { status, message } => {
                assert_eq!(status, None);
                assert_eq!(message, "nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_null_data_is_upstream_error() {
        let err = decode_envelope::<Employee>(br#"{"data":null,"status":"ok"}"#).unwrap_err();
        assert!(matches!(err, EmployeeError::Upstream { .. }));
    }

    #[test]
    fn test_garbage_is_upstream_error() {
        let err = decode_envelope::<Vec<Employee>>(b"<html>oops</html>").unwrap_err();
        assert!(err.to_string().contains("malformed envelope"));
    }

    #[test]
    fn test_wrong_payload_shape_is_upstream_error() {
        let err = decode_envelope::<Vec<Employee>>(br#"{"data":{"id":"1"}}"#).unwrap_err();
        assert!(matches!(err, EmployeeError::Upstream { .. }));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(br#"{"status":"Failed","error":"Too many requests"}"#).as_deref(),
            Some("Too many requests")
        );
        assert_eq!(error_message(b"not json"), None);
    }
}
