//! Decision request normalization and result classification.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::{json, Map, Value};

use pingauthz_core::protocol::decision::{
    Decision, DecisionRequest, DecisionResult, POLICY_REQUEST_KEY,
};

fn args(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap()
}

#[test]
fn policy_request_is_filled_when_absent() {
    let req = DecisionRequest::new("u1", "transfer", Map::new());
    assert_eq!(req.parameters()[POLICY_REQUEST_KEY], "transfer");
}

#[test]
fn caller_policy_request_is_left_untouched() {
    let params = args(json!({ "Policy Request": "access", "amount": 10 }));
    let req = DecisionRequest::new("u1", "payment", params);
    assert_eq!(req.parameters()[POLICY_REQUEST_KEY], "access");
    assert_eq!(req.parameters()["amount"], 10);
}

#[test]
fn arguments_default_to_payment() {
    let req = DecisionRequest::from_arguments(&args(json!({ "user_id": "u1" }))).unwrap();
    assert_eq!(req.policy_request_kind(), "payment");
    assert_eq!(req.parameters()[POLICY_REQUEST_KEY], "payment");
}

#[test]
fn missing_user_id_is_validation_error() {
    for bad in [json!({}), json!({ "user_id": "" }), json!({ "user_id": null })] {
        let err = DecisionRequest::from_arguments(&args(bad)).expect_err("must fail");
        assert_eq!(err.client_code().as_str(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "user_id is required");
    }
}

#[test]
fn wrongly_typed_arguments_are_rejected() {
    let cases = [
        json!({ "user_id": 42 }),
        json!({ "user_id": "u1", "policy_request": 1 }),
        json!({ "user_id": "u1", "parameters": [1, 2] }),
    ];
    for bad in cases {
        let err = DecisionRequest::from_arguments(&args(bad)).expect_err("must fail");
        assert_eq!(err.client_code().as_str(), "VALIDATION_ERROR");
    }
}

#[test]
fn backend_body_shape() {
    let req = DecisionRequest::from_arguments(&args(json!({
        "user_id": "u1",
        "parameters": { "Request - Payment.paymentAmount": 99 }
    })))
    .unwrap();
    assert_eq!(
        req.to_backend_body(),
        json!({
            "parameters": {
                "Request - Payment.paymentAmount": 99,
                "Policy Request": "payment"
            },
            "userContext": { "user": { "id": "u1" } }
        })
    );
}

#[test]
fn classification_defaults_to_unknown() {
    let cases = [
        (json!({ "decision": "PERMIT" }), Decision::Permit),
        (json!({ "decision": "DENY" }), Decision::Deny),
        (json!({ "decision": "NOT_APPLICABLE" }), Decision::NotApplicable),
        (json!({ "decision": "INDETERMINATE" }), Decision::Unknown),
        (json!({ "decision": 1 }), Decision::Unknown),
        (json!({ "text": "<html>" }), Decision::Unknown),
        (json!([1, 2]), Decision::Unknown),
    ];
    for (payload, expected) in cases {
        let res = DecisionResult::from_payload(payload.clone());
        assert_eq!(res.decision(), expected, "payload={payload}");
        assert_eq!(res.raw_payload(), &payload);
    }
}

#[test]
fn summary_mentions_decision_and_payload() {
    let res = DecisionResult::from_payload(json!({ "decision": "PERMIT", "id": "d-1" }));
    let text = res.render_summary();
    assert!(text.starts_with("Authorization Decision: PERMIT\n"));
    assert!(text.contains("The request is authorized."));
    assert!(text.contains("Full response: "));
    assert!(text.contains("\"id\":\"d-1\""));
}

#[test]
fn summary_for_unrecognized_decision_keeps_raw_label() {
    let res = DecisionResult::from_payload(json!({ "decision": "INDETERMINATE" }));
    let text = res.render_summary();
    assert!(text.contains("Authorization Decision: INDETERMINATE"));
    assert!(text.contains("Decision status: INDETERMINATE"));

    let missing = DecisionResult::from_payload(json!({}));
    assert!(missing.render_summary().contains("Authorization Decision: UNKNOWN"));
}
