//! Proxy config loader (strict parsing + environment overrides).

pub mod env;
pub mod schema;

use std::fs;
use std::path::Path;

use pingauthz_core::error::{ProxyError, Result};

pub use schema::{ClientAuthMethod, DecisionSection, GatewaySection, IdentitySection, ProxyConfig};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "PINGAUTHZ_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "pingauthz.yaml";

pub fn load_from_file(path: &str) -> Result<ProxyConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ProxyError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ProxyConfig> {
    let cfg: ProxyConfig = serde_yaml::from_str(s)
        .map_err(|e| ProxyError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Startup load: file (if present) then process environment overrides.
pub fn load() -> Result<ProxyConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let cfg = if Path::new(&path).exists() {
        load_from_file(&path)?
    } else {
        tracing::info!(%path, "config file not found, using defaults");
        load_from_str("version: 1")?
    };
    let cfg = env::with_env_overrides(cfg, |k| std::env::var(k).ok());
    cfg.validate()?;
    Ok(cfg)
}
