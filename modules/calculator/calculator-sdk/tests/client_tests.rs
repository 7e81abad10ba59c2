#![allow(clippy::unwrap_used, clippy::expect_used)]

//! HTTP client and fallback client tests against a mock server.

use std::net::TcpListener;
use std::str::FromStr;
use std::sync::Arc;

use calculator_sdk::{
    CalculatorClientV1, CalculatorError, CalculatorHttpClient, EvalError,
    FallbackCalculatorClient, Operator,
};
use httpmock::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Base URL of a port nothing listens on.
fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn test_calculate_sends_operands_and_decodes_result() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/calculate")
            .json_body(json!({"a": "5", "b": "2", "operation": "/"}));
        then.status(200).json_body(json!({
            "success": true,
            "result": 2.5,
            "calculation": {"a": 5, "b": 2, "operation": "/", "result": 2.5}
        }));
    });

    let client = CalculatorHttpClient::new(&server.base_url()).unwrap();
    let calc = client
        .calculate(d("5"), d("2"), Operator::Divide)
        .await
        .unwrap();

    mock.assert();
    assert_eq!(calc.a, d("5"));
    assert_eq!(calc.b, d("2"));
    assert_eq!(calc.operator, Operator::Divide);
    assert_eq!(calc.result, d("2.5"));
}

#[tokio::test]
async fn test_calculate_maps_error_envelope() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST).path("/calculate");
        then.status(400).json_body(json!({
            "success": false,
            "error": "Division by zero is not allowed",
            "code": "DIVISION_BY_ZERO"
        }));
    });

    let client = CalculatorHttpClient::new(&server.base_url()).unwrap();
    let err = client
        .calculate(d("1"), Decimal::ZERO, Operator::Divide)
        .await
        .unwrap_err();

    match err {
        CalculatorError::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 400);
            assert_eq!(code, "DIVISION_BY_ZERO");
            assert_eq!(message, "Division by zero is not allowed");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_still_maps_to_api_error() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(502).body("bad gateway");
    });

    let client = CalculatorHttpClient::new(&server.base_url()).unwrap();
    let err = client.health().await.unwrap_err();

    assert!(matches!(err, CalculatorError::Api { status: 502, .. }));
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(DELETE).path("/history");
        then.status(200).json_body(json!({"success": true}));
    });

    let client = CalculatorHttpClient::new(&server.base_url()).unwrap();
    let err = client.clear_history().await.unwrap_err();

    assert!(matches!(err, CalculatorError::Decode(_)));
}

#[tokio::test]
async fn test_history_passes_limit_and_decodes_entries() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/history").query_param("limit", "2");
        then.status(200).json_body(json!({
            "success": true,
            "history": [
                {"id": 2, "calculation": "4 * 2 = 8", "result": 8, "timestamp": "2024-01-01T12:00:00Z"},
                {"id": 1, "calculation": "1 / 2 = 0.5", "result": 0.5, "timestamp": "2024-01-01T11:59:00Z"}
            ],
            "count": 2
        }));
    });

    let client = CalculatorHttpClient::new(&server.base_url()).unwrap();
    let history = client.history(Some(2)).await.unwrap();

    mock.assert();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, 2);
    assert_eq!(history[0].calculation, "4 * 2 = 8");
    assert_eq!(history[0].timestamp.unix_timestamp(), 1_704_110_400);
    assert_eq!(history[1].result, d("0.5"));
}

#[tokio::test]
async fn test_clear_operations_and_health() {
    let server = MockServer::start();
    let _clear = server.mock(|when, then| {
        when.method(DELETE).path("/history");
        then.status(200).json_body(json!({
            "success": true,
            "message": "History cleared successfully",
            "deleted": 3
        }));
    });
    let _ops = server.mock(|when, then| {
        when.method(GET).path("/operations");
        then.status(200).json_body(json!({
            "success": true,
            "operations": ["+", "-", "*", "/"],
            "description": {"+": "Addition", "-": "Subtraction", "*": "Multiplication", "/": "Division"}
        }));
    });
    let _health = server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200).json_body(json!({
            "success": true,
            "status": "healthy",
            "timestamp": "2024-01-01T12:00:00Z",
            "version": "0.1.0"
        }));
    });

    let client = CalculatorHttpClient::new(&server.base_url()).unwrap();

    assert_eq!(client.clear_history().await.unwrap(), 3);

    let ops = client.operations().await.unwrap();
    assert_eq!(ops.operations, Operator::ALL.to_vec());
    assert_eq!(ops.description["*"], "Multiplication");

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "0.1.0");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = CalculatorHttpClient::new(&unreachable_base_url()).unwrap();
    let err = client
        .calculate(d("1"), d("1"), Operator::Add)
        .await
        .unwrap_err();

    assert!(err.is_network());
}

#[tokio::test]
async fn test_fallback_evaluates_locally_when_unreachable() {
    let remote = Arc::new(CalculatorHttpClient::new(&unreachable_base_url()).unwrap());
    let client = FallbackCalculatorClient::new(remote);

    let calc = client
        .calculate(d("5"), d("3"), Operator::Add)
        .await
        .unwrap();
    assert_eq!(calc.result, d("8"));
    assert_eq!(calc.to_string(), "5 + 3 = 8");

    let err = client
        .calculate(d("1"), Decimal::ZERO, Operator::Divide)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CalculatorError::Evaluation(EvalError::DivisionByZero)
    ));

    // Only `calculate` has a local path.
    assert!(client.history(None).await.unwrap_err().is_network());
}

#[tokio::test]
async fn test_fallback_passes_api_errors_through() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/calculate");
        then.status(400).json_body(json!({
            "success": false,
            "error": "Division by zero is not allowed",
            "code": "DIVISION_BY_ZERO"
        }));
    });

    let remote = Arc::new(CalculatorHttpClient::new(&server.base_url()).unwrap());
    let client = FallbackCalculatorClient::new(remote);
    let err = client
        .calculate(d("1"), Decimal::ZERO, Operator::Divide)
        .await
        .unwrap_err();

    mock.assert();
    assert!(matches!(err, CalculatorError::Api { status: 400, .. }));
}

#[tokio::test]
async fn test_fallback_prefers_remote_result() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST).path("/calculate");
        then.status(200).json_body(json!({
            "success": true,
            "result": 15,
            "calculation": {"a": 5, "b": 3, "operation": "*", "result": 15}
        }));
    });

    let remote = Arc::new(CalculatorHttpClient::new(&server.base_url()).unwrap());
    let client = FallbackCalculatorClient::new(remote);
    let calc = client
        .calculate(d("5"), d("3"), Operator::Multiply)
        .await
        .unwrap();

    assert_eq!(calc.result, d("15"));
}
