//! Environment override layer, applied once at process start.
//!
//! The lookup is injected so the layer can be exercised without mutating the
//! process environment.

use super::schema::{non_empty, ProxyConfig};

pub const CLIENT_ID: &str = "PINGONE_CLIENT_ID";
pub const CLIENT_SECRET: &str = "PINGONE_CLIENT_SECRET";
pub const ENV_ID: &str = "PINGONE_ENV_ID";
pub const DECISION_ENDPOINT_ID: &str = "PINGONE_DECISION_ENDPOINT_ID";
pub const DECISION_ID: &str = "PINGONE_DECISION_ID";
pub const TOKEN_URL: &str = "PINGONE_TOKEN_URL";
pub const API_BASE: &str = "PINGONE_API_BASE";
pub const AUTH_BASE: &str = "PINGONE_AUTH_BASE";

/// Return `cfg` with every set variable applied on top.
///
/// After overrides, an unset `decision_endpoint_id` takes the value of the
/// older `decision_id`.
pub fn with_env_overrides<F>(mut cfg: ProxyConfig, lookup: F) -> ProxyConfig
where
    F: Fn(&str) -> Option<String>,
{
    let id = &mut cfg.identity;
    if let Some(v) = lookup(CLIENT_ID) {
        id.client_id = Some(v);
    }
    if let Some(v) = lookup(CLIENT_SECRET) {
        id.client_secret = Some(v);
    }
    if let Some(v) = lookup(TOKEN_URL) {
        id.token_url = v;
    }
    if let Some(v) = lookup(AUTH_BASE) {
        id.auth_base = Some(v);
    }

    let dec = &mut cfg.decision;
    if let Some(v) = lookup(ENV_ID) {
        dec.env_id = Some(v);
    }
    if let Some(v) = lookup(DECISION_ENDPOINT_ID) {
        dec.decision_endpoint_id = Some(v);
    }
    if let Some(v) = lookup(DECISION_ID) {
        dec.decision_id = Some(v);
    }
    if let Some(v) = lookup(API_BASE) {
        dec.api_base = v;
    }

    if non_empty(&dec.decision_endpoint_id).is_none() {
        if let Some(legacy) = non_empty(&dec.decision_id) {
            dec.decision_endpoint_id = Some(legacy.to_string());
        }
    }

    cfg
}
