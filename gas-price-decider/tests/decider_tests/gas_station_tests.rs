//! The gas station decider asks the node and falls back on any failure.

use crate::init_logger;
use alloy_primitives::I256;
use gas_price_decider::{
    config::GasStationConfig,
    decider::{Decision, GAS_USED_UNKNOWN, GWEI},
    error::ParseQuantityError,
    DeciderError, GasPriceDecider, GasStationDecider,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Duration;

#[path = "../api_tests/helpers.rs"]
mod helpers;
use helpers::{
    spawn_mock_node, spawn_node_answering, spawn_truncating_node, unreachable_rpc_url, NodeReply,
};

const FROM: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const TO: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
const DATA: &str = "0xa9059cbb";

fn fallback() -> Decimal {
    Decimal::from(6 * GWEI)
}

fn decider_for(rpc_url: &str) -> GasStationDecider {
    GasStationDecider::new(fallback(), &GasStationConfig::new(rpc_url))
}

#[actix_web::test]
async fn test_gas_price_from_node() {
    init_logger();
    let node = spawn_node_answering("0x4a817c800");
    let decider = decider_for(&node.rpc_url);

    let decision = decider.decide_gas_price().await;
    assert_eq!(decision, Decision::Resolved(Decimal::from(20_000_000_000u64)));
    assert_eq!(decision.value().scale(), 0);

    // Exactly one eth_gasPrice call in the documented wire form
    let requests = node.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body,
        json!({"jsonrpc": "2.0", "method": "eth_gasPrice", "id": "1"})
    );
    assert!(requests[0]
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("application/json"));
}

#[actix_web::test]
async fn test_gas_price_is_fetched_on_every_call() {
    init_logger();
    let node = spawn_node_answering("0x3b9aca00");
    let decider = decider_for(&node.rpc_url);

    assert_eq!(decider.gas_price_in_wei().await, Decimal::from(GWEI));
    assert_eq!(decider.gas_price_in_wei().await, Decimal::from(GWEI));
    assert_eq!(node.requests().len(), 2);
}

#[actix_web::test]
async fn test_empty_result_falls_back() {
    init_logger();
    let node = spawn_node_answering("");
    let decider = decider_for(&node.rpc_url);

    let decision = decider.decide_gas_price().await;
    assert_eq!(
        decision,
        Decision::Degraded {
            value: fallback(),
            reason: DeciderError::EmptyResult,
        }
    );
    assert_eq!(decider.gas_price_in_wei().await, fallback());
}

#[actix_web::test]
async fn test_missing_result_falls_back() {
    init_logger();
    let node = spawn_mock_node(NodeReply::Json(json!({"jsonrpc": "2.0", "id": "1"})));
    let decision = decider_for(&node.rpc_url).decide_gas_price().await;
    assert_eq!(decision.reason(), Some(&DeciderError::EmptyResult));
    assert_eq!(*decision.value(), fallback());
}

#[actix_web::test]
async fn test_jsonrpc_error_falls_back() {
    init_logger();
    let node = spawn_mock_node(NodeReply::Json(json!({
        "jsonrpc": "2.0",
        "id": "1",
        "error": {"code": -32601, "message": "the method eth_gasPrice does not exist"}
    })));
    let decision = decider_for(&node.rpc_url).decide_gas_price().await;
    assert_eq!(
        decision,
        Decision::Degraded {
            value: fallback(),
            reason: DeciderError::Rpc {
                code: -32601,
                message: "the method eth_gasPrice does not exist".to_string(),
            },
        }
    );
}

#[actix_web::test]
async fn test_result_survives_malformed_error_field() {
    init_logger();
    let node = spawn_mock_node(NodeReply::Json(json!({
        "jsonrpc": "2.0",
        "id": "1",
        "result": "0x4a817c800",
        "error": "ignored"
    })));
    let decision = decider_for(&node.rpc_url).decide_gas_price().await;
    assert_eq!(decision, Decision::Resolved(Decimal::from(20_000_000_000u64)));
}

#[actix_web::test]
async fn test_non_object_error_without_result_falls_back() {
    init_logger();
    let node = spawn_mock_node(NodeReply::Json(json!({
        "jsonrpc": "2.0",
        "id": "1",
        "error": "rate limited"
    })));
    let decision = decider_for(&node.rpc_url).decide_gas_price().await;
    assert_eq!(
        decision,
        Decision::Degraded {
            value: fallback(),
            reason: DeciderError::Rpc {
                code: 0,
                message: "\"rate limited\"".to_string(),
            },
        }
    );
}

#[actix_web::test]
async fn test_truncated_body_falls_back() {
    init_logger();
    let decision = decider_for(&spawn_truncating_node()).decide_gas_price().await;
    assert!(
        matches!(decision.reason(), Some(DeciderError::Body(_))),
        "unexpected reason: {:?}",
        decision.reason()
    );
    assert_eq!(decision.into_value(), fallback());
}

#[actix_web::test]
async fn test_malformed_body_falls_back() {
    init_logger();
    let node = spawn_mock_node(NodeReply::Raw(200, "<html>bad gateway</html>"));
    let decision = decider_for(&node.rpc_url).decide_gas_price().await;
    assert!(matches!(decision.reason(), Some(DeciderError::Decode(_))));
    assert_eq!(decision.into_value(), fallback());
}

#[actix_web::test]
async fn test_http_error_falls_back() {
    init_logger();
    let node = spawn_mock_node(NodeReply::Raw(500, "internal error"));
    let decision = decider_for(&node.rpc_url).decide_gas_price().await;
    assert_eq!(
        decision,
        Decision::Degraded {
            value: fallback(),
            reason: DeciderError::Status(500),
        }
    );
}

#[actix_web::test]
async fn test_unreachable_node_falls_back() {
    init_logger();
    let decider = decider_for(&unreachable_rpc_url());
    let decision = decider.decide_gas_price().await;
    assert!(matches!(decision.reason(), Some(DeciderError::Transport(_))));
    assert_eq!(decision.into_value(), fallback());
}

#[actix_web::test]
async fn test_invalid_url_falls_back() {
    init_logger();
    let decision = decider_for("not a url").decide_gas_price().await;
    assert!(matches!(decision.reason(), Some(DeciderError::Transport(_))));
    assert_eq!(decision.into_value(), fallback());
}

#[actix_web::test]
async fn test_stalled_node_times_out_to_fallback() {
    init_logger();
    let node = spawn_mock_node(NodeReply::Stall(Duration::from_secs(5)));
    let config = GasStationConfig::new(&node.rpc_url).with_timeout(Duration::from_millis(200));
    let decider = GasStationDecider::new(fallback(), &config);

    let decision = decider.decide_gas_price().await;
    assert!(matches!(decision.reason(), Some(DeciderError::Transport(_))));
    assert_eq!(decision.into_value(), fallback());
}

#[actix_web::test]
async fn test_unparsable_results_fall_back() {
    init_logger();
    for result in ["not-a-number", "0x10000000000000000", "1.5"] {
        let node = spawn_node_answering(result);
        let decision = decider_for(&node.rpc_url).decide_gas_price().await;
        assert!(
            matches!(decision.reason(), Some(DeciderError::Parse(_))),
            "{result} should not parse"
        );
        assert_eq!(decision.into_value(), fallback());
    }

    let node = spawn_node_answering("0x10000000000000000");
    let decision = decider_for(&node.rpc_url).decide_gas_price().await;
    assert!(matches!(
        decision.reason(),
        Some(DeciderError::Parse(ParseQuantityError::OutOfRange(_)))
    ));
}

#[actix_web::test]
async fn test_gas_used_from_node() {
    init_logger();
    let node = spawn_node_answering("0x5208");
    let decider = decider_for(&node.rpc_url);

    let gas = decider.evaluate_gas_used(FROM, TO, DATA).await;
    assert_eq!(gas, I256::try_from(21_000i64).unwrap());

    let requests = node.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body,
        json!({
            "jsonrpc": "2.0",
            "method": "eth_estimateGas",
            "params": [{"from": FROM, "to": TO, "data": DATA}],
            "id": "1"
        })
    );
}

#[actix_web::test]
async fn test_gas_used_falls_back_to_unknown() {
    init_logger();
    let node = spawn_mock_node(NodeReply::Json(json!({
        "jsonrpc": "2.0",
        "id": "1",
        "error": {"code": 3, "message": "execution reverted"}
    })));
    let decider = decider_for(&node.rpc_url);
    assert_eq!(decider.evaluate_gas_used(FROM, TO, DATA).await, GAS_USED_UNKNOWN);

    let decider = decider_for(&unreachable_rpc_url());
    let decision = decider.decide_gas_used(FROM, TO, DATA).await;
    assert!(matches!(decision.reason(), Some(DeciderError::Transport(_))));
    assert_eq!(decision.into_value(), I256::MINUS_ONE);
}
