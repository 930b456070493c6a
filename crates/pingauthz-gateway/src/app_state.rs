//! Shared application state for the pingauthz gateway.
//!
//! Built once at startup: one HTTP client, one token cache shared by the MCP
//! and legacy endpoints, and a dispatcher with the built-in tools registered.

use std::sync::Arc;
use std::time::Duration;

use pingauthz_core::error::Result;
use pingauthz_core::protocol::mcp::ServerInfo;

use crate::config::ProxyConfig;
use crate::dispatch::Dispatcher;
use crate::obs::ProxyMetrics;
use crate::services::EvaluateDecisionTool;
use crate::upstream::{build_http_client, Clock, DecisionClient, IdentityClient, SystemClock, TokenCache};

pub const SERVER_NAME: &str = "pingone-authorize-mcp";
pub const SERVER_VERSION: &str = "1.0.0";

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    decision: Arc<DecisionClient>,
    dispatcher: Dispatcher,
    metrics: Arc<ProxyMetrics>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: ProxyConfig) -> Result<Self> {
        Self::with_clock(cfg, Arc::new(SystemClock))
    }

    /// Same as [`AppState::new`] with an explicit time source for the token cache.
    pub fn with_clock(cfg: ProxyConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let metrics = Arc::new(ProxyMetrics::default());
        let http = build_http_client(Duration::from_millis(cfg.decision.request_timeout_ms))?;

        let identity = Arc::new(IdentityClient::new(
            http.clone(),
            cfg.identity.clone(),
            cfg.decision.env_id.clone(),
            Arc::clone(&metrics),
        ));
        let tokens = TokenCache::with_clock(identity, clock);
        let decision = Arc::new(DecisionClient::new(
            http,
            cfg.decision.clone(),
            tokens,
            Arc::clone(&metrics),
        ));

        let dispatcher = Dispatcher::new(
            ServerInfo {
                name: SERVER_NAME,
                version: SERVER_VERSION,
            },
            Arc::clone(&metrics),
        );
        dispatcher.register_tool(Arc::new(EvaluateDecisionTool::new(Arc::clone(&decision))));

        tracing::info!(
            tools = ?dispatcher.registered_tools(),
            auth_method = cfg.identity.auth_method.as_str(),
            "gateway state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                decision,
                dispatcher,
                metrics,
            }),
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    pub fn decision_client(&self) -> Arc<DecisionClient> {
        Arc::clone(&self.inner.decision)
    }

    pub fn metrics(&self) -> Arc<ProxyMetrics> {
        Arc::clone(&self.inner.metrics)
    }
}
