use std::net::SocketAddr;

use serde::Deserialize;
use url::Url;

use pingauthz_core::error::{ProxyError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub identity: IdentitySection,

    #[serde(default)]
    pub decision: DecisionSection,
}

impl ProxyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ProxyError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.gateway.validate()?;
        self.identity.validate()?;
        self.decision.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ProxyError::Config(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

/// How the client authenticates to the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    /// HTTP Basic header built from `client_id:client_secret`.
    #[default]
    ClientSecretBasic,
    /// `client_id` / `client_secret` sent as form fields.
    ClientSecretPost,
}

impl ClientAuthMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientAuthMethod::ClientSecretBasic => "client_secret_basic",
            ClientAuthMethod::ClientSecretPost => "client_secret_post",
        }
    }
}

/// Identity provider (client-credentials grant).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentitySection {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Used to derive `<auth_base>/<env_id>/as/token` when `token_url` is empty.
    #[serde(default)]
    pub auth_base: Option<String>,

    #[serde(default)]
    pub auth_method: ClientAuthMethod,
}

impl Default for IdentitySection {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            token_url: default_token_url(),
            auth_base: None,
            auth_method: ClientAuthMethod::default(),
        }
    }
}

impl IdentitySection {
    pub fn validate(&self) -> Result<()> {
        if !self.token_url.is_empty() {
            check_url("identity.token_url", &self.token_url)?;
        }
        if let Some(base) = non_empty(&self.auth_base) {
            check_url("identity.auth_base", base)?;
        }
        Ok(())
    }

    /// Token endpoint, falling back to one derived from `auth_base`.
    pub fn resolve_token_url(&self, env_id: Option<&str>) -> Result<String> {
        if !self.token_url.is_empty() {
            return Ok(self.token_url.clone());
        }
        let base = non_empty(&self.auth_base).ok_or_else(|| {
            ProxyError::Credential("identity.token_url or identity.auth_base is required".into())
        })?;
        let env_id = env_id.filter(|s| !s.is_empty()).ok_or_else(|| {
            ProxyError::Credential("env_id is required to build the token URL".into())
        })?;
        Ok(format!("{}/{}/as/token", base.trim_end_matches('/'), env_id))
    }
}

fn default_token_url() -> String {
    "https://auth.pingone.com/as/token".into()
}

/// Decision endpoint (PingOne Authorize).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionSection {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default)]
    pub env_id: Option<String>,

    /// Preferred name of the decision endpoint identifier.
    #[serde(default)]
    pub decision_endpoint_id: Option<String>,

    /// Older name of the same identifier, used only when the preferred one is unset.
    #[serde(default)]
    pub decision_id: Option<String>,

    #[serde(default)]
    pub append_evaluate: bool,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for DecisionSection {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            env_id: None,
            decision_endpoint_id: None,
            decision_id: None,
            append_evaluate: false,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl DecisionSection {
    pub fn validate(&self) -> Result<()> {
        check_url("decision.api_base", &self.api_base)?;
        if !(1000..=120000).contains(&self.request_timeout_ms) {
            return Err(ProxyError::Config(
                "decision.request_timeout_ms must be between 1000 and 120000".into(),
            ));
        }
        Ok(())
    }

    pub fn env_id(&self) -> Option<&str> {
        non_empty(&self.env_id)
    }

    /// Decision endpoint id: `decision_endpoint_id`, else `decision_id`.
    pub fn effective_endpoint_id(&self) -> Option<&str> {
        non_empty(&self.decision_endpoint_id).or_else(|| non_empty(&self.decision_id))
    }
}

fn default_api_base() -> String {
    "https://api.pingone.com/v1".into()
}
fn default_request_timeout_ms() -> u64 {
    30000
}

pub(crate) fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn check_url(field: &str, raw: &str) -> Result<()> {
    Url::parse(raw)
        .map(|_| ())
        .map_err(|e| ProxyError::Config(format!("{field} is not a valid URL: {e}")))
}
