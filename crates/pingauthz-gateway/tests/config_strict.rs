#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use pingauthz_gateway::config::{self, ClientAuthMethod};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
decision:
  env_id: "env-1"
  decision_endpont_id: "dep-1" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG_ERROR");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8000");
    assert_eq!(cfg.identity.token_url, "https://auth.pingone.com/as/token");
    assert_eq!(cfg.identity.auth_method, ClientAuthMethod::ClientSecretBasic);
    assert_eq!(cfg.decision.api_base, "https://api.pingone.com/v1");
    assert_eq!(cfg.decision.request_timeout_ms, 30000);
    assert!(!cfg.decision.append_evaluate);
    assert!(cfg.decision.effective_endpoint_id().is_none());
}

#[test]
fn unsupported_version_fails() {
    let err = config::load_from_str("version: 2").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG_ERROR");
}

#[test]
fn invalid_urls_and_ranges_fail() {
    let cases = [
        "version: 1\ndecision:\n  api_base: \"not a url\"\n",
        "version: 1\nidentity:\n  token_url: \"::\"\n",
        "version: 1\ndecision:\n  request_timeout_ms: 10\n",
        "version: 1\ngateway:\n  listen: \"localhost\"\n",
    ];
    for bad in cases {
        assert!(config::load_from_str(bad).is_err(), "should fail: {bad}");
    }
}

#[test]
fn client_secret_post_is_accepted() {
    let cfg = config::load_from_str(
        "version: 1\nidentity:\n  auth_method: client_secret_post\n",
    )
    .unwrap();
    assert_eq!(cfg.identity.auth_method, ClientAuthMethod::ClientSecretPost);
}

#[test]
fn missing_identifiers_are_not_a_load_error() {
    let cfg = config::load_from_str("version: 1\nidentity:\n  client_id: \"cid\"\n").unwrap();
    assert!(cfg.identity.client_secret.is_none());
    assert!(cfg.decision.env_id().is_none());
}

#[test]
fn decision_id_is_used_when_endpoint_id_absent() {
    let cfg = config::load_from_str(
        "version: 1\ndecision:\n  decision_id: \"old-id\"\n",
    )
    .unwrap();
    assert_eq!(cfg.decision.effective_endpoint_id(), Some("old-id"));

    let both = config::load_from_str(
        "version: 1\ndecision:\n  decision_id: \"old-id\"\n  decision_endpoint_id: \"new-id\"\n",
    )
    .unwrap();
    assert_eq!(both.decision.effective_endpoint_id(), Some("new-id"));
}

#[test]
fn token_url_can_be_derived_from_auth_base() {
    let cfg = config::load_from_str(
        "version: 1\nidentity:\n  token_url: \"\"\n  auth_base: \"https://auth.pingone.eu/\"\n",
    )
    .unwrap();
    assert_eq!(
        cfg.identity.resolve_token_url(Some("env-9")).unwrap(),
        "https://auth.pingone.eu/env-9/as/token"
    );
    let err = cfg.identity.resolve_token_url(None).expect_err("needs env id");
    assert_eq!(err.client_code().as_str(), "CREDENTIAL_ERROR");
}
