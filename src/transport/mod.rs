//! HTTP transport to the backup-orchestration server.
//!
//! The [`Transport`] trait is the single seam between the SDK and the
//! network. It returns the raw `(flag, response)` pair that the shared
//! response processing in [`response`] turns into typed results, so
//! higher layers never touch status codes directly.

pub mod response;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::Result;

/// Relative endpoints understood by the orchestration server.
pub mod services {
    /// Submits an immediate backup or restore task.
    pub const CREATE_TASK: &str = "CreateTask";

    /// Properties of a single subclient, fetched with GET and updated
    /// with POST.
    pub fn subclient(subclient_id: u32) -> String {
        format!("Subclient/{subclient_id}")
    }
}

/// Request/response seam to the orchestration server.
///
/// `flag` is true when the server answered with a success status;
/// `response` is the decoded JSON body, if the server sent one. Transport
/// failures below the HTTP layer surface as errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<(bool, Option<Value>)>;
}

/// `reqwest`-backed transport holding the service base URL and the
/// authentication token issued at login.
///
/// Connection pooling, TLS and timeouts are whatever the underlying
/// `reqwest::Client` provides; this layer does not retry.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base: Url,
    auth_token: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, auth_token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            base: Url::parse(base_url)?,
            auth_token: auth_token.into(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<(bool, Option<Value>)> {
        let url = self.base.join(endpoint)?;
        debug!(%method, %url, "submitting request");

        let mut request = self
            .http
            .request(method, url)
            .header("Authtoken", &self.auth_token)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let flag = response.status().is_success();
        if !flag {
            debug!(status = response.status().as_u16(), "non-success status");
        }
        let payload = response.json::<Value>().await.ok();
        Ok((flag, payload))
    }
}
