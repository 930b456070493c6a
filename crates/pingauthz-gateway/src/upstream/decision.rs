//! Decision endpoint client.
//!
//! Target resolution and request sending are separate steps so the legacy
//! pass-through endpoint builds exactly the same call as `evaluate`.

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::ACCEPT;
use serde_json::Value;

use pingauthz_core::error::{ProxyError, Result};
use pingauthz_core::protocol::decision::{DecisionRequest, DecisionResult};

use crate::config::DecisionSection;
use crate::obs::ProxyMetrics;

use super::{TokenCache, UpstreamReply};

/// Fully resolved decision endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionTarget {
    pub url: String,
}

pub struct DecisionClient {
    http: reqwest::Client,
    cfg: DecisionSection,
    tokens: TokenCache,
    metrics: Arc<ProxyMetrics>,
}

impl DecisionClient {
    pub fn new(
        http: reqwest::Client,
        cfg: DecisionSection,
        tokens: TokenCache,
        metrics: Arc<ProxyMetrics>,
    ) -> Self {
        Self {
            http,
            cfg,
            tokens,
            metrics,
        }
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// `<api_base>/environments/<env_id>/decisionEndpoints/<id>[/evaluate]`.
    pub fn resolve_target(&self) -> Result<DecisionTarget> {
        let (env_id, endpoint_id) = match (self.cfg.env_id(), self.cfg.effective_endpoint_id()) {
            (Some(env), Some(ep)) => (env, ep),
            _ => {
                return Err(ProxyError::Config(
                    "Missing PingOne ENV_ID or DECISION_ENDPOINT_ID in config".into(),
                ))
            }
        };

        let mut url = format!(
            "{}/environments/{}/decisionEndpoints/{}",
            self.cfg.api_base.trim_end_matches('/'),
            env_id,
            endpoint_id
        );
        if self.cfg.append_evaluate {
            url.push_str("/evaluate");
        }
        Ok(DecisionTarget { url })
    }

    /// Bearer-authenticated JSON POST. Any HTTP status is returned as a reply;
    /// only transport failures are errors.
    pub async fn send(
        &self,
        target: &DecisionTarget,
        token: &str,
        body: &Value,
    ) -> Result<UpstreamReply> {
        tracing::debug!(url = %target.url, has_token = !token.is_empty(), "calling decision endpoint");

        let started = Instant::now();
        let resp = self
            .http
            .post(&target.url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await;
        self.metrics
            .upstream_duration
            .observe(&[("target", "decision")], started.elapsed());

        let resp = resp.map_err(|e| {
            if e.is_timeout() {
                ProxyError::UpstreamTransport(format!("decision request timed out: {e}"))
            } else {
                ProxyError::UpstreamTransport(format!("decision request failed: {e}"))
            }
        })?;

        UpstreamReply::read(resp).await
    }

    /// Evaluate one decision. A non-success status is an `Upstream` error
    /// carrying the status and body.
    pub async fn evaluate(&self, request: &DecisionRequest) -> Result<DecisionResult> {
        let target = self.resolve_target()?;

        let token = self.tokens.get_token().await.map_err(|e| match e {
            e @ ProxyError::Credential(_) => e,
            other => ProxyError::Credential(other.to_string()),
        })?;

        let reply = self
            .send(&target, &token, &request.to_backend_body())
            .await?;

        if !reply.is_success() {
            tracing::warn!(status = reply.status, "decision endpoint returned error status");
            return Err(ProxyError::Upstream {
                status: reply.status,
                body: reply.body,
            });
        }

        let result = DecisionResult::from_payload(reply.payload);
        tracing::debug!(decision = %result.decision(), "decision evaluated");
        Ok(result)
    }
}
