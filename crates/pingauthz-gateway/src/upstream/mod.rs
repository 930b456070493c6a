//! Outbound calls: identity provider (token) and decision endpoint.
//!
//! Every request goes through one shared `reqwest::Client` carrying the
//! configured timeout, so a stalled upstream surfaces as an error instead of
//! a hung request task.

pub mod decision;
pub mod identity;
pub mod token_cache;

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};

use pingauthz_core::error::{ProxyError, Result};

pub use decision::{DecisionClient, DecisionTarget};
pub use identity::{FetchedToken, IdentityClient};
pub use token_cache::{CachedToken, Clock, SystemClock, TokenCache, REFRESH_MARGIN};

pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProxyError::Internal(format!("http client build failed: {e}")))
}

/// Status and decoded body of an upstream reply.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    /// JSON body, or `{"text": <body>}` when the reply is not JSON.
    pub payload: Value,
    /// Raw body text.
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read a response. A JSON content-type with an undecodable body is an
    /// upstream error only when the status claims success.
    pub(crate) async fn read(resp: reqwest::Response) -> Result<Self> {
        let status = resp.status().as_u16();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);
        let body = resp
            .text()
            .await
            .map_err(|e| ProxyError::UpstreamTransport(format!("failed to read response body: {e}")))?;

        let payload = if is_json {
            match serde_json::from_str(&body) {
                Ok(v) => v,
                Err(_) if !(200..300).contains(&status) => json!({ "text": body }),
                Err(e) => {
                    return Err(ProxyError::Upstream {
                        status,
                        body: format!("invalid JSON body: {e}"),
                    })
                }
            }
        } else {
            json!({ "text": body })
        };

        Ok(Self {
            status,
            payload,
            body,
        })
    }
}
