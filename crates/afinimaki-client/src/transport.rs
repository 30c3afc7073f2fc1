//! Transport boundary for remote calls.
//!
//! The client only ever talks to the service through the [`Transport`]
//! trait, so tests can swap in a recording double and never touch the
//! network.

use async_trait::async_trait;

use afinimaki_core::{AfiniError, AfiniResult};

use crate::xmlrpc::{self, Value};

/// Remote-call primitive: one method invocation, one decoded result.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Invoke `method` with `params` and return the decoded result value.
    async fn call(&self, method: &str, params: &[Value]) -> AfiniResult<Value>;
}

/// XML-RPC over HTTP transport backed by `reqwest`.
///
/// Stateless per call apart from `reqwest`'s own connection reuse; no
/// retries and no client-imposed timeout.
pub struct XmlRpcTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl XmlRpcTransport {
    /// Create a transport bound to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// The endpoint this transport posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for XmlRpcTransport {
    async fn call(&self, method: &str, params: &[Value]) -> AfiniResult<Value> {
        let body = xmlrpc::encode_request(method, params);

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                AfiniError::network_with_source(
                    format!("request to {} failed", self.endpoint),
                    Box::new(e),
                )
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AfiniError::network_with_source("failed to read response body", Box::new(e))
        })?;

        if !status.is_success() {
            return Err(AfiniError::http_status(status.as_u16(), text));
        }

        xmlrpc::parse_response(&text)
    }
}
