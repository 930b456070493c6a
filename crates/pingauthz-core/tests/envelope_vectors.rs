//! JSON-RPC envelope vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use serde_json::{json, Value};

use pingauthz_core::protocol::jsonrpc::{decode_request, RpcResponse};
use pingauthz_core::ProxyError;

fn load(name: &str) -> Vec<u8> {
    fs::read(format!("tests/vectors/{name}")).unwrap()
}

#[test]
fn parse_envelope_min() {
    let req = decode_request(&load("envelope_min.json")).unwrap();
    assert_eq!(req.method, "initialize");
    assert_eq!(req.id, Some(json!(1)));
    assert!(req.params.is_none());
}

#[test]
fn parse_envelope_tools_call() {
    let req = decode_request(&load("envelope_tools_call.json")).unwrap();
    assert_eq!(req.method, "tools/call");
    assert_eq!(req.response_id(), json!("req-42"));
    let params = req.params.unwrap();
    assert_eq!(params["name"], "evaluate_authorization_decision");
    assert_eq!(params["arguments"]["user_id"], "user-123");
}

#[test]
fn envelope_without_method_is_parse_error() {
    let err = decode_request(&load("envelope_no_method.json")).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "PARSE_ERROR");
    assert_eq!(err.client_code().rpc_code(), -32700);
}

#[test]
fn envelope_with_array_params_is_parse_error() {
    let err = decode_request(&load("envelope_params_array.json")).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "PARSE_ERROR");
}

#[test]
fn garbage_body_is_parse_error() {
    let err = decode_request(b"{not json").expect_err("must fail");
    assert!(matches!(err, ProxyError::Parse(_)));
}

#[test]
fn missing_id_echoes_null() {
    let req = decode_request(br#"{"method":"tools/list"}"#).unwrap();
    assert_eq!(req.response_id(), Value::Null);
}

#[test]
fn success_response_has_result_only() {
    let resp = RpcResponse::success(json!(3), json!({"ok": true}));
    assert!(!resp.is_error());
    let v = serde_json::to_value(&resp).unwrap();
    assert_eq!(v["jsonrpc"], "2.0");
    assert_eq!(v["id"], 3);
    assert_eq!(v["result"]["ok"], true);
    assert!(v.get("error").is_none());
}

#[test]
fn failure_response_has_error_only() {
    let err = ProxyError::UnknownMethod("unknown_op".into());
    let resp = RpcResponse::failure(json!("abc"), &err);
    assert!(resp.is_error());
    let v = serde_json::to_value(&resp).unwrap();
    assert_eq!(v["id"], "abc");
    assert_eq!(v["error"]["code"], -32601);
    assert_eq!(v["error"]["message"], "Method not found");
    assert_eq!(v["error"]["data"], "Unknown method: unknown_op");
    assert!(v.get("result").is_none());
}

#[test]
fn parse_failure_serializes_null_id() {
    let err = ProxyError::Parse("eof".into());
    let v = serde_json::to_value(RpcResponse::failure(Value::Null, &err)).unwrap();
    assert!(v["id"].is_null());
    assert!(v.as_object().unwrap().contains_key("id"));
    assert_eq!(v["error"]["code"], -32700);
    assert_eq!(v["error"]["message"], "Parse error");
}

#[test]
fn internal_errors_map_to_server_error() {
    let err = ProxyError::Internal("boom".into());
    let v = serde_json::to_value(RpcResponse::failure(json!(1), &err)).unwrap();
    assert_eq!(v["error"]["code"], -32000);
    assert_eq!(v["error"]["message"], "Server error");
}
