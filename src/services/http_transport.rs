// src/services/http_transport.rs
//! HTTP access to the registry web service.
//!
//! Every registry response is reduced to a [`ResultResponse`]: whether the call
//! succeeded (HTTP 200) and the body's `result` member. Transport failures are folded
//! into the same shape with the error text as result, so callers have one channel to
//! inspect.

use crate::error::{MyIdError, Result};
use crate::utils::serialization::{is_truthy, value_to_string};
use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Outcome of one registry HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultResponse {
    pub status: bool,
    pub result: Value,
}

impl ResultResponse {
    pub fn success(result: Value) -> Self {
        Self {
            status: true,
            result,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            result: Value::String(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status
    }

    /// The result as text, or `None` when it is empty.
    pub fn get_result_string(&self) -> Option<String> {
        is_truthy(&self.result).then(|| value_to_string(&self.result))
    }
}

impl fmt::Display for ResultResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"{{"status":{},"result":"{}"}}"#,
            self.status,
            self.get_result_string().unwrap_or_default()
        )
    }
}

/// HTTP collaborator used by the registry client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> ResultResponse;

    async fn post(&self, url: &str, body: &Value) -> ResultResponse;
}

/// [`HttpTransport`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    /// Returns [`MyIdError::Rpc`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MyIdError::Rpc(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { http_client })
    }

    async fn into_result_response(
        response: std::result::Result<reqwest::Response, reqwest::Error>,
    ) -> ResultResponse {
        let response = match response {
            Ok(response) => response,
            Err(e) => return ResultResponse::failure(e.to_string()),
        };
        let status = response.status() == StatusCode::OK;
        match response.json::<Value>().await {
            Ok(body) => ResultResponse {
                status,
                result: body.get("result").cloned().unwrap_or(Value::Null),
            },
            Err(e) => ResultResponse::failure(e.to_string()),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> ResultResponse {
        debug!("GET {}", url);
        Self::into_result_response(self.http_client.get(url).send().await).await
    }

    async fn post(&self, url: &str, body: &Value) -> ResultResponse {
        debug!("POST {} {}", url, body);
        Self::into_result_response(self.http_client.post(url).json(body).send().await).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_result_response_rendering() {
        let ok = ResultResponse::success(json!({"sig": "abc"}));
        assert_eq!(ok.get_result_string().as_deref(), Some(r#"{"sig":"abc"}"#));

        let empty = ResultResponse::success(Value::Null);
        assert_eq!(empty.get_result_string(), None);
        assert_eq!(empty.to_string(), r#"{"status":true,"result":""}"#);

        let failed = ResultResponse::failure("boom");
        assert_eq!(failed.to_string(), r#"{"status":false,"result":"boom"}"#);
    }

    #[tokio::test]
    async fn test_get_extracts_result_member() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/credential/isValid")
            .match_query(Matcher::UrlEncoded("sig".into(), "abc".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"result":{"isValid":true}}"#)
            .create_async()
            .await;

        let response = transport()
            .get(&format!("{}/v1/credential/isValid?sig=abc", server.url()))
            .await;

        assert!(response.is_success());
        assert_eq!(response.result, json!({"isValid": true}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_non_200_is_failure_with_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/credential/register")
            .match_body(Matcher::Json(json!({"jwt": "a.b.c", "nid": "2"})))
            .with_status(400)
            .with_body(r#"{"result":"duplicated credential"}"#)
            .create_async()
            .await;

        let response = transport()
            .post(
                &format!("{}/v1/credential/register", server.url()),
                &json!({"jwt": "a.b.c", "nid": "2"}),
            )
            .await;

        assert!(!response.is_success());
        assert_eq!(response.get_result_string().as_deref(), Some("duplicated credential"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_json_body_is_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/did/did:icon:02:abc")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let response = transport()
            .get(&format!("{}/v1/did/did:icon:02:abc", server.url()))
            .await;
        assert!(!response.is_success());
        assert!(response.get_result_string().is_some());
    }
}
