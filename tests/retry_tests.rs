//! Retry and backoff behaviour of the model client
//!
//! Runs on paused tokio time, so backoff delays are observed through the
//! recorded call instants without actually sleeping.

mod common;

use common::mocks::{api_error, text, ScriptedTransport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use yit::llm::{CallWeight, GenerateRequest};
use yit::types::AppError;
use yit::RetryPolicy;

fn request() -> GenerateRequest {
    GenerateRequest::new("gemini-2.5-flash").with_user_text("Investigate dropshipping")
}

/// Fails the first `failures` calls with `error`, then answers "ok".
fn failing_then_ok(failures: usize, error: fn() -> AppError) -> Arc<ScriptedTransport> {
    let counter = AtomicUsize::new(0);
    ScriptedTransport::new(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < failures {
            Err(error())
        } else {
            text("ok")
        }
    })
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_twice_then_success() {
    let transport = failing_then_ok(2, || api_error(429, "RESOURCE_EXHAUSTED: slow down"));
    let client = transport.client(RetryPolicy::default());

    let response = client
        .generate(&request(), CallWeight::Light)
        .await
        .expect("third attempt succeeds");
    assert_eq!(response.text(), "ok");

    let calls = transport.calls();
    assert_eq!(calls.len(), 3);

    let first_gap = calls[1].at - calls[0].at;
    let second_gap = calls[2].at - calls[1].at;
    assert!(first_gap >= Duration::from_millis(2000));
    assert!(second_gap >= Duration::from_millis(4000));
    assert!(second_gap > first_gap);
}

#[tokio::test(start_paused = true)]
async fn test_forbidden_is_not_retried() {
    let transport = failing_then_ok(usize::MAX, || api_error(403, "PERMISSION_DENIED"));
    let client = transport.client(RetryPolicy::default());

    let err = client
        .generate(&request(), CallWeight::Light)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Api { status: 403, .. }));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_server_errors_exhaust_the_policy() {
    let transport = failing_then_ok(usize::MAX, || api_error(503, "UNAVAILABLE"));
    let client = transport.client(RetryPolicy::default());

    let started = tokio::time::Instant::now();
    let err = client
        .generate(&request(), CallWeight::Heavy)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Api { status: 503, .. }));
    assert_eq!(transport.call_count(), 4);
    // 2s + 4s + 8s of backoff
    assert!(started.elapsed() >= Duration::from_secs(14));
}

#[tokio::test(start_paused = true)]
async fn test_quota_message_is_retryable_on_any_status() {
    let transport = failing_then_ok(1, || api_error(400, "Quota exceeded for project"));
    let policy = RetryPolicy::default().with_initial_delay(Duration::from_millis(10));
    let client = transport.client(policy);

    client
        .generate(&request(), CallWeight::Light)
        .await
        .expect("second attempt succeeds");
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_network_errors_are_retried() {
    let transport = failing_then_ok(3, || AppError::Network("connection reset".to_string()));
    let client = transport.client(RetryPolicy::default());

    client
        .generate(&request(), CallWeight::Light)
        .await
        .expect("fourth attempt succeeds");
    assert_eq!(transport.call_count(), 4);
}

#[tokio::test]
async fn test_parse_errors_are_not_retried() {
    let transport = failing_then_ok(usize::MAX, || AppError::LLM("garbled".to_string()));
    let client = transport.client(RetryPolicy::default());

    assert!(client.generate(&request(), CallWeight::Light).await.is_err());
    assert_eq!(transport.call_count(), 1);
}
