// Retry orchestration for a single topic.
//
// Each attempt runs the full generate -> sanitize -> validate chain. Any
// failure is retried after a linear backoff (backoff_unit * attempt number)
// until the attempt budget is spent. The first non-empty validated list wins.

use std::time::Duration;

use tracing::{info, warn};

use super::sanitize::sanitize;
use super::validate::validate;
use crate::error::{AttemptFailure, ExhaustedRetries};
use crate::generation::traits::GenerationClient;
use crate::models::KeywordMetric;

/// Default number of attempts per topic.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay between attempts.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_millis(1000);

/// Attempt budget and backoff for one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Values below 1 behave as 1.
    pub max_attempts: u32,
    /// Multiplied by the attempt number to get the delay after that attempt.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt)
    }

    fn attempt_budget(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// One pass through the chain, with no retries.
pub async fn attempt_once(
    client: &dyn GenerationClient,
    topic: &str,
) -> Result<Vec<KeywordMetric>, AttemptFailure> {
    let raw = client.generate(topic).await?;
    let candidate = sanitize(&raw)?;
    Ok(validate(candidate)?)
}

/// Run the chain for `topic` until it yields keywords or the budget runs out.
pub async fn run(
    client: &dyn GenerationClient,
    topic: &str,
    policy: &RetryPolicy,
) -> Result<Vec<KeywordMetric>, ExhaustedRetries> {
    let max_attempts = policy.attempt_budget();
    let mut attempt = 1u32;

    loop {
        match attempt_once(client, topic).await {
            Ok(keywords) => {
                info!(
                    topic = topic,
                    attempt = attempt,
                    keywords = keywords.len(),
                    "Generated keywords"
                );
                return Ok(keywords);
            }
            Err(failure) => {
                if attempt >= max_attempts || !failure.is_retryable() {
                    warn!(
                        topic = topic,
                        attempt = attempt,
                        kind = failure.kind(),
                        error = %failure,
                        "Giving up on topic"
                    );
                    return Err(ExhaustedRetries {
                        attempts: attempt,
                        last: failure,
                    });
                }

                let delay = policy.delay_after(attempt);
                warn!(
                    topic = topic,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    kind = failure.kind(),
                    error = %failure,
                    delay_ms = delay.as_millis() as u64,
                    "Attempt {}/{} failed, retrying in {}ms",
                    attempt,
                    max_attempts,
                    delay.as_millis(),
                );

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
