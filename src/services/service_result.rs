// src/services/service_result.rs
//! Uniform outcome of issuer and verifier operations.

use crate::jwt::VerifyResult;
use crate::protocol::message::SignResult;
use crate::services::http_transport::ResultResponse;
use crate::utils::serialization::{is_truthy, value_to_string};
use serde_json::{Map, Value};

/// Success flag plus whichever payload the operation produces.
///
/// `fail_message` is derived: it is the text of `result` when the operation failed
/// and `result` is not empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResult {
    success: bool,
    result: Option<Value>,
    signed_object: Option<Map<String, Value>>,
    fail_message: Option<String>,
}

impl ServiceResult {
    fn new(success: bool, result: Option<Value>, signed_object: Option<Map<String, Value>>) -> Self {
        let fail_message = match &result {
            Some(value) if !success && is_truthy(value) => Some(value_to_string(value)),
            _ => None,
        };
        Self {
            success,
            result,
            signed_object,
            fail_message,
        }
    }

    pub fn from_fail_message(message: impl Into<String>) -> Self {
        Self::new(false, Some(Value::String(message.into())), None)
    }

    /// Wraps a registry response.
    pub fn from_result(response: ResultResponse) -> Self {
        let result = (!response.result.is_null()).then_some(response.result);
        Self::new(response.status, result, None)
    }

    /// Wraps a sign/encrypt outcome; the signed message lands in `signed_object`.
    pub fn from_signed_object(sign_result: SignResult) -> Self {
        Self::new(
            sign_result.success,
            sign_result.fail_message.map(Value::String),
            sign_result.result,
        )
    }

    pub fn from_verify_result(verify_result: VerifyResult) -> Self {
        let result = if verify_result.success {
            None
        } else {
            verify_result.fail_message.map(Value::String)
        };
        Self::new(verify_result.success, result, None)
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn signed_object(&self) -> Option<&Map<String, Value>> {
        self.signed_object.as_ref()
    }

    pub fn fail_message(&self) -> Option<&str> {
        self.fail_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fail_message_only_on_failure() {
        let ok = ServiceResult::from_result(ResultResponse::success(json!({"isValid": true})));
        assert!(ok.success());
        assert_eq!(ok.result(), Some(&json!({"isValid": true})));
        assert_eq!(ok.fail_message(), None);

        let failed = ServiceResult::from_result(ResultResponse::failure("not found"));
        assert!(!failed.success());
        assert_eq!(failed.fail_message(), Some("not found"));
    }

    #[test]
    fn test_empty_failure_has_no_message() {
        let failed = ServiceResult::from_result(ResultResponse {
            status: false,
            result: Value::Null,
        });
        assert!(!failed.success());
        assert_eq!(failed.fail_message(), None);
    }

    #[test]
    fn test_from_verify_result() {
        let ok = ServiceResult::from_verify_result(VerifyResult::success());
        assert!(ok.success());
        assert!(ok.result().is_none());

        let bad = ServiceResult::from_verify_result(VerifyResult::failure("JWT signature is invalid"));
        assert_eq!(bad.fail_message(), Some("JWT signature is invalid"));
    }

    #[test]
    fn test_from_signed_object() {
        let mut signed = Map::new();
        signed.insert("type".into(), json!("RES_CREDENTIAL"));
        let result = ServiceResult::from_signed_object(SignResult {
            success: true,
            result: Some(signed),
            fail_message: None,
        });
        assert!(result.success());
        assert_eq!(result.signed_object().unwrap()["type"], "RES_CREDENTIAL");
        assert!(result.fail_message().is_none());
    }
}
