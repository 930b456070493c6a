//! OAuth2 client-credentials exchange against the identity provider.
//!
//! Two client-authentication styles are supported and kept as separate
//! request builders: `client_secret_basic` (HTTP Basic header) and
//! `client_secret_post` (credentials in the form body).

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use pingauthz_core::error::{ProxyError, Result};

use crate::config::schema::non_empty;
use crate::config::{ClientAuthMethod, IdentitySection};
use crate::obs::ProxyMetrics;

use super::UpstreamReply;

/// Lifetime assumed when the provider omits `expires_in`.
pub const DEFAULT_EXPIRES_IN: Duration = Duration::from_secs(3600);

const GRANT_TYPE: &str = "client_credentials";

/// Token as returned by the provider, before caching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedToken {
    pub access_token: String,
    pub expires_in: Duration,
}

pub struct IdentityClient {
    http: reqwest::Client,
    cfg: IdentitySection,
    env_id: Option<String>,
    metrics: Arc<ProxyMetrics>,
}

impl IdentityClient {
    /// `env_id` is only needed when the token URL is derived from `auth_base`.
    pub fn new(
        http: reqwest::Client,
        cfg: IdentitySection,
        env_id: Option<String>,
        metrics: Arc<ProxyMetrics>,
    ) -> Self {
        Self {
            http,
            cfg,
            env_id,
            metrics,
        }
    }

    /// Perform one client-credentials exchange.
    pub async fn fetch(&self) -> Result<FetchedToken> {
        let res = self.fetch_inner().await;
        let outcome = if res.is_ok() { "ok" } else { "error" };
        self.metrics.token_refreshes.inc(&[("outcome", outcome)]);
        res
    }

    async fn fetch_inner(&self) -> Result<FetchedToken> {
        let token_url = self.cfg.resolve_token_url(self.env_id.as_deref())?;
        let (client_id, client_secret) =
            match (non_empty(&self.cfg.client_id), non_empty(&self.cfg.client_secret)) {
                (Some(id), Some(secret)) => (id, secret),
                _ => {
                    return Err(ProxyError::Credential(
                        "Missing PingOne credentials in config or environment variables".into(),
                    ))
                }
            };

        let req = match self.cfg.auth_method {
            ClientAuthMethod::ClientSecretBasic => {
                self.basic_auth_request(&token_url, client_id, client_secret)
            }
            ClientAuthMethod::ClientSecretPost => {
                self.form_auth_request(&token_url, client_id, client_secret)
            }
        };

        tracing::debug!(
            %token_url,
            auth_method = self.cfg.auth_method.as_str(),
            "requesting access token"
        );

        let started = Instant::now();
        let resp = req.send().await;
        self.metrics
            .upstream_duration
            .observe(&[("target", "token")], started.elapsed());

        let resp = resp.map_err(|e| {
            if e.is_timeout() {
                ProxyError::Credential(format!("token request timed out: {e}"))
            } else {
                ProxyError::Credential(format!("token request failed: {e}"))
            }
        })?;
        let reply = UpstreamReply::read(resp).await.map_err(|e| match e {
            e @ ProxyError::Upstream { .. } => e,
            other => ProxyError::Credential(other.to_string()),
        })?;

        tracing::debug!(status = reply.status, "token response");

        if !reply.is_success() {
            tracing::warn!(status = reply.status, "token endpoint rejected request");
            return Err(ProxyError::Upstream {
                status: reply.status,
                body: reply.body,
            });
        }

        parse_token_payload(&reply.payload)
    }

    fn basic_auth_request(
        &self,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> reqwest::RequestBuilder {
        self.http
            .post(token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", GRANT_TYPE)])
    }

    fn form_auth_request(
        &self,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> reqwest::RequestBuilder {
        self.http.post(token_url).form(&[
            ("grant_type", GRANT_TYPE),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ])
    }
}

/// Extract `access_token` / `expires_in` from a token response.
pub fn parse_token_payload(payload: &Value) -> Result<FetchedToken> {
    let access_token = payload
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProxyError::Credential("token missing from response".into()))?;

    let expires_in = match payload.get("expires_in") {
        Some(Value::Number(n)) => n.as_f64().map(|f| f.max(0.0) as u64),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .map(Duration::from_secs)
    .unwrap_or(DEFAULT_EXPIRES_IN);

    Ok(FetchedToken {
        access_token: access_token.to_string(),
        expires_in,
    })
}
