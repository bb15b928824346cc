// Batch coordination: fan topics out to concurrent retry runs.
//
// Every topic gets its own tokio task with its own attempt counter and
// backoff timer. We wait for all of them; a topic that exhausts its retries
// becomes a TopicResult with an error string and never affects its siblings.
// Results are assembled by input index, so completion order doesn't matter.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{error, info, warn};

use super::retry::{self, RetryPolicy};
use crate::error::{BatchError, ExhaustedRetries, InputError};
use crate::generation::traits::GenerationClient;
use crate::models::{BatchResult, KeywordMetric, TopicResult};

/// Request field carrying the topics.
pub const TOPICS_FIELD: &str = "primaryKeywords";

/// A generation client plus the retry policy applied to every topic.
#[derive(Clone)]
pub struct KeywordPipeline {
    client: Arc<dyn GenerationClient>,
    policy: RetryPolicy,
}

impl KeywordPipeline {
    pub fn new(client: Arc<dyn GenerationClient>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Generate keywords for a single topic, with retries.
    pub async fn run_topic(&self, topic: &str) -> Result<Vec<KeywordMetric>, ExhaustedRetries> {
        retry::run(self.client.as_ref(), topic, &self.policy).await
    }

    /// Generate keywords for every topic concurrently.
    ///
    /// Only an empty topic list or a task that died without reporting back
    /// (panic) fails the whole batch; per-topic failures are recorded in
    /// the returned results.
    pub async fn run_batch(&self, topics: &[String]) -> Result<BatchResult, BatchError> {
        if topics.is_empty() {
            return Err(InputError::Empty.into());
        }

        info!(topics = topics.len(), "Starting keyword batch");

        let handles = topics.iter().cloned().map(|topic| {
            let client = Arc::clone(&self.client);
            let policy = self.policy;
            tokio::spawn(async move {
                let outcome = retry::run(client.as_ref(), &topic, &policy).await;
                (topic, outcome)
            })
        });

        let joined = join_all(handles).await;

        let mut results = Vec::with_capacity(joined.len());
        for (index, outcome) in joined.into_iter().enumerate() {
            let (topic, outcome) = outcome.map_err(|e| {
                error!(index = index, error = %e, "Topic task did not complete");
                BatchError::Internal(format!("topic task {index} did not complete: {e}"))
            })?;

            let result = match outcome {
                Ok(keywords) => TopicResult::success(topic, keywords),
                Err(e) => {
                    warn!(topic = %topic, error = %e, "Recording failed topic");
                    TopicResult::failure(topic, &e)
                }
            };
            results.push(result);
        }

        let batch = BatchResult::new(results);
        info!(
            topics = batch.len(),
            failed = batch.failed_count(),
            "Keyword batch complete"
        );
        Ok(batch)
    }
}

/// Pull the topic list out of a request body.
///
/// The field must be present, be a list, be non-empty and hold only strings.
pub fn parse_topics(request: &Value) -> Result<Vec<String>, InputError> {
    let field = match request.get(TOPICS_FIELD) {
        None | Some(Value::Null) => return Err(InputError::Missing),
        Some(field) => field,
    };

    let items = field.as_array().ok_or(InputError::NotAList)?;
    if items.is_empty() {
        return Err(InputError::Empty);
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or(InputError::NotText(i))
        })
        .collect()
}

/// Split comma-separated input into topics, dropping blank pieces.
pub fn split_topic_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_topics_accepts_string_list() {
        let topics = parse_topics(&json!({"primaryKeywords": ["running shoes", "sneakers"]}));
        assert_eq!(topics.unwrap(), vec!["running shoes", "sneakers"]);
    }

    #[test]
    fn parse_topics_rejects_bad_shapes() {
        assert_eq!(parse_topics(&json!({})), Err(InputError::Missing));
        assert_eq!(
            parse_topics(&json!({"primaryKeywords": null})),
            Err(InputError::Missing)
        );
        assert_eq!(
            parse_topics(&json!({"primaryKeywords": "shoes"})),
            Err(InputError::NotAList)
        );
        assert_eq!(
            parse_topics(&json!({"primaryKeywords": []})),
            Err(InputError::Empty)
        );
        assert_eq!(
            parse_topics(&json!({"primaryKeywords": ["shoes", 3]})),
            Err(InputError::NotText(1))
        );
        assert_eq!(parse_topics(&json!(["shoes"])), Err(InputError::Missing));
    }

    #[test]
    fn split_topic_list_trims_and_drops_blanks() {
        assert_eq!(
            split_topic_list(" running shoes, hiking boots ,, sneakers ,"),
            vec!["running shoes", "hiking boots", "sneakers"]
        );
        assert!(split_topic_list(" , ").is_empty());
    }
}
