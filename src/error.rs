// Failure taxonomy for the keyword pipeline.
//
// Per-attempt failures (service, sanitize, validation) share one tagged union
// so the retry loop treats them uniformly while logs can still tell them apart.
// Only InputError and internal coordinator errors ever reach the caller as
// failures; everything per-topic ends up as text on a TopicResult.

use thiserror::Error;

/// The text-generation service could not produce usable text.
///
/// Transport errors, timeouts, non-2xx statuses and empty payloads are all
/// reported the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generation service failed: {0}")]
pub struct ServiceFailure(pub String);

impl ServiceFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Nothing was left after stripping fences and whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no JSON content found in response")]
pub struct SanitizeFailure;

/// The sanitized text was not a usable list of keyword metrics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("failed to parse JSON response: {0}")]
    Malformed(String),

    #[error("response is not a list")]
    NotAList,

    #[error("no valid keywords found in response")]
    Empty,
}

/// One failed generate → sanitize → validate attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error(transparent)]
    Service(#[from] ServiceFailure),

    #[error(transparent)]
    Sanitize(#[from] SanitizeFailure),

    #[error(transparent)]
    Validation(#[from] ValidationFailure),
}

impl AttemptFailure {
    /// Every attempt failure is worth another try: the upstream model is
    /// non-deterministic, so the same input can succeed on the next call.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service(_) | Self::Sanitize(_) | Self::Validation(_) => true,
        }
    }

    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Service(_) => "service",
            Self::Sanitize(_) => "sanitize",
            Self::Validation(ValidationFailure::Malformed(_)) => "validation.malformed",
            Self::Validation(ValidationFailure::NotAList) => "validation.not_a_list",
            Self::Validation(ValidationFailure::Empty) => "validation.empty",
        }
    }
}

/// A topic used up its attempt budget without a valid keyword list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed after {attempts} attempts: {last}")]
pub struct ExhaustedRetries {
    pub attempts: u32,
    pub last: AttemptFailure,
}

/// The batch request itself was unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("primaryKeywords is missing")]
    Missing,

    #[error("primaryKeywords is not a list")]
    NotAList,

    #[error("primaryKeywords is empty")]
    Empty,

    #[error("primaryKeywords[{0}] is not a string")]
    NotText(usize),
}

/// Batch-level failure. Per-topic failures never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("invalid batch request: {0}")]
    Input(#[from] InputError),

    #[error("keyword batch failed unexpectedly: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_retries_carries_last_failure_text() {
        let err = ExhaustedRetries {
            attempts: 3,
            last: ValidationFailure::Empty.into(),
        };
        assert_eq!(
            err.to_string(),
            "failed after 3 attempts: no valid keywords found in response"
        );
    }

    #[test]
    fn all_attempt_failures_are_retryable() {
        let failures: Vec<AttemptFailure> = vec![
            ServiceFailure::new("connection reset").into(),
            SanitizeFailure.into(),
            ValidationFailure::Malformed("eof".into()).into(),
            ValidationFailure::NotAList.into(),
            ValidationFailure::Empty.into(),
        ];
        assert!(failures.iter().all(AttemptFailure::is_retryable));
    }

    #[test]
    fn kinds_distinguish_causes() {
        assert_eq!(AttemptFailure::from(ServiceFailure::new("x")).kind(), "service");
        assert_eq!(AttemptFailure::from(SanitizeFailure).kind(), "sanitize");
        assert_eq!(
            AttemptFailure::from(ValidationFailure::Empty).kind(),
            "validation.empty"
        );
    }
}
