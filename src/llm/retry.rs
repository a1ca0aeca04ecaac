//! Retry, backoff and per-attempt timeouts for remote model calls.

use crate::types::{AppError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Whether a failed call is worth repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Fatal,
    Retryable,
}

/// Which timeout applies to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallWeight {
    #[default]
    Light,
    /// Long structured generations such as full book drafts.
    Heavy,
}

/// Exponential backoff settings.
///
/// The delay before retry `n` (zero-based) is `initial_delay * backoff_factor^n`.
/// Timeouts race each individual attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub backoff_factor: u32,
    pub timeout: Option<Duration>,
    pub heavy_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(2000),
            backoff_factor: 2,
            timeout: Some(Duration::from_secs(30)),
            heavy_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, default timeouts.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_timeouts(mut self, light: Option<Duration>, heavy: Option<Duration>) -> Self {
        self.timeout = light;
        self.heavy_timeout = heavy;
        self
    }

    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.backoff_factor.max(1).saturating_pow(retry);
        self.initial_delay.saturating_mul(factor)
    }

    pub fn timeout_for(&self, weight: CallWeight) -> Option<Duration> {
        match weight {
            CallWeight::Light => self.timeout,
            CallWeight::Heavy => self.heavy_timeout,
        }
    }
}

/// Sorts an error into fatal or retryable.
///
/// Authorization failures and malformed requests are fatal. Rate limits,
/// server errors, timeouts and network failures are retryable.
pub fn classify(err: &AppError) -> FailureClass {
    match err {
        AppError::Api { status, message } => match *status {
            401 | 403 => FailureClass::Fatal,
            408 | 429 => FailureClass::Retryable,
            s if s >= 500 => FailureClass::Retryable,
            _ if is_rate_limit_message(message) => FailureClass::Retryable,
            _ => FailureClass::Fatal,
        },
        AppError::Network(_) | AppError::Timeout(_) => FailureClass::Retryable,
        _ => FailureClass::Fatal,
    }
}

fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("resource_exhausted")
        || lower.contains("resource exhausted")
        || lower.contains("rate limit")
        || lower.contains("quota")
}

/// Runs `operation` until it succeeds, fails fatally or exhausts the policy.
///
/// `label` names the call in log events, usually the model id.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    weight: CallWeight,
    label: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let limit = policy.timeout_for(weight);
    let mut retry = 0u32;

    loop {
        let outcome = match limit {
            Some(limit) => match tokio::time::timeout(limit, operation()).await {
                Ok(result) => result,
                Err(_) => Err(AppError::Timeout(format!(
                    "{} did not answer within {}s",
                    label,
                    limit.as_secs_f32()
                ))),
            },
            None => operation().await,
        };

        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if classify(&err) == FailureClass::Fatal {
            error!(model = label, error = %err, "Fatal model error, not retrying");
            return Err(err);
        }

        if retry >= policy.max_retries {
            warn!(
                model = label,
                attempts = retry + 1,
                error = %err,
                "Retries exhausted"
            );
            return Err(err);
        }

        let delay = policy.delay_for(retry);
        retry += 1;
        warn!(
            model = label,
            retry,
            max_retries = policy.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Model call failed, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn api(status: u16, message: &str) -> AppError {
        AppError::Api {
            status,
            message: message.to_string(),
        }
    }

    #[rstest]
    #[case(api(429, "Too many requests"), FailureClass::Retryable)]
    #[case(api(400, "RESOURCE_EXHAUSTED: quota"), FailureClass::Retryable)]
    #[case(api(503, "overloaded"), FailureClass::Retryable)]
    #[case(api(500, "internal"), FailureClass::Retryable)]
    #[case(api(403, "PERMISSION_DENIED"), FailureClass::Fatal)]
    #[case(api(401, "API key not valid"), FailureClass::Fatal)]
    #[case(api(400, "Invalid JSON payload"), FailureClass::Fatal)]
    #[case(api(404, "model not found"), FailureClass::Fatal)]
    #[case(AppError::Timeout("t".into()), FailureClass::Retryable)]
    #[case(AppError::Network("reset".into()), FailureClass::Retryable)]
    #[case(AppError::Auth("missing key".into()), FailureClass::Fatal)]
    #[case(AppError::parse("bad", "raw"), FailureClass::Fatal)]
    fn test_classify(#[case] err: AppError, #[case] expected: FailureClass) {
        assert_eq!(classify(&err), expected);
    }

    #[test]
    fn test_delays_double() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(8000));
    }

    #[test]
    fn test_timeout_by_weight() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.timeout_for(CallWeight::Light),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            policy.timeout_for(CallWeight::Heavy),
            Some(Duration::from_secs(120))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result: Result<()> = with_retry(&policy, CallWeight::Light, "m", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(api(503, "unavailable")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempt_times_out_then_retries() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default().with_max_retries(1);

        let result = with_retry(&policy, CallWeight::Light, "m", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                }
                Ok(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
