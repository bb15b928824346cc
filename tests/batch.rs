// Batch coordination tests.
//
// A scripted GenerationClient stands in for Gemini so we can control which
// topics fail and how long each call takes. Backoff sleeps run on tokio's
// paused clock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tailfinder::error::{BatchError, InputError, ServiceFailure};
use tailfinder::generation::traits::GenerationClient;
use tailfinder::pipeline::{KeywordPipeline, RetryPolicy};

fn keywords_for(topic: &str) -> String {
    format!(
        "```json\n[{{\"keyword\":\"best {topic} for beginners\",\"searchVolume\":1200,\"difficulty\":45}},\
         {{\"keyword\":\"{topic} near me\",\"searchVolume\":800,\"difficulty\":30}}]\n```"
    )
}

/// Succeeds for every topic except those listed in `failing`, optionally
/// delaying specific topics to shuffle completion order.
#[derive(Default)]
struct TopicClient {
    failing: Vec<&'static str>,
    delays: HashMap<&'static str, Duration>,
    calls: Mutex<HashMap<String, u32>>,
    total: AtomicU32,
}

impl TopicClient {
    fn calls_for(&self, topic: &str) -> u32 {
        self.calls.lock().unwrap().get(topic).copied().unwrap_or(0)
    }
}

#[async_trait]
impl GenerationClient for TopicClient {
    async fn generate(&self, topic: &str) -> Result<String, ServiceFailure> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self
            .calls
            .lock()
            .unwrap()
            .entry(topic.to_string())
            .or_default() += 1;

        if let Some(delay) = self.delays.get(topic) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.iter().any(|f| *f == topic) {
            return Err(ServiceFailure::new("Gemini API returned 500: internal"));
        }
        Ok(keywords_for(topic))
    }
}

fn topics(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn failing_topic_is_isolated_and_order_preserved() {
    let client = Arc::new(TopicClient {
        failing: vec!["hiking boots"],
        ..Default::default()
    });
    let pipeline = KeywordPipeline::new(client.clone(), RetryPolicy::default());

    let batch = pipeline
        .run_batch(&topics(&["running shoes", "hiking boots", "sneakers"]))
        .await
        .unwrap();

    let results = batch.results();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].topic(), "running shoes");
    assert_eq!(results[1].topic(), "hiking boots");
    assert_eq!(results[2].topic(), "sneakers");

    assert!(!results[0].keywords().is_empty());
    assert!(results[0].error().is_none());
    assert!(!results[2].keywords().is_empty());
    assert!(results[2].error().is_none());

    assert!(results[1].keywords().is_empty());
    let error = results[1].error().unwrap();
    assert!(!error.is_empty());
    assert!(error.contains("failed after 3 attempts"));

    assert_eq!(client.calls_for("running shoes"), 1);
    assert_eq!(client.calls_for("hiking boots"), 3);
    assert_eq!(client.calls_for("sneakers"), 1);
    assert_eq!(batch.failed_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn order_follows_input_not_completion() {
    let client = Arc::new(TopicClient {
        delays: HashMap::from([
            ("slow", Duration::from_secs(30)),
            ("medium", Duration::from_secs(5)),
        ]),
        ..Default::default()
    });
    let pipeline = KeywordPipeline::new(client, RetryPolicy::default());

    let batch = pipeline
        .run_batch(&topics(&["slow", "medium", "fast"]))
        .await
        .unwrap();

    let order: Vec<&str> = batch.results().iter().map(|r| r.topic()).collect();
    assert_eq!(order, vec!["slow", "medium", "fast"]);
    assert!(batch.results().iter().all(|r| r.is_success()));
}

#[tokio::test(start_paused = true)]
async fn topics_run_concurrently() {
    let client = Arc::new(TopicClient {
        delays: HashMap::from([
            ("a", Duration::from_secs(10)),
            ("b", Duration::from_secs(10)),
            ("c", Duration::from_secs(10)),
        ]),
        ..Default::default()
    });
    let pipeline = KeywordPipeline::new(client, RetryPolicy::default());
    let start = tokio::time::Instant::now();

    pipeline.run_batch(&topics(&["a", "b", "c"])).await.unwrap();

    // Sequential processing would take 30s.
    assert!(start.elapsed() < Duration::from_secs(11));
}

#[tokio::test(start_paused = true)]
async fn all_topics_failing_still_returns_complete_batch() {
    let client = Arc::new(TopicClient {
        failing: vec!["a", "b"],
        ..Default::default()
    });
    let pipeline = KeywordPipeline::new(client, RetryPolicy::default());

    let batch = pipeline.run_batch(&topics(&["a", "b"])).await.unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(batch.failed_count(), 2);
    assert_eq!(batch.all_keywords().count(), 0);
}

#[tokio::test(start_paused = true)]
async fn duplicate_topics_are_processed_independently() {
    let client = Arc::new(TopicClient::default());
    let pipeline = KeywordPipeline::new(client.clone(), RetryPolicy::default());

    let batch = pipeline
        .run_batch(&topics(&["sneakers", "sneakers"]))
        .await
        .unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(client.calls_for("sneakers"), 2);
}

#[tokio::test]
async fn empty_batch_is_an_input_error_without_calls() {
    let client = Arc::new(TopicClient::default());
    let pipeline = KeywordPipeline::new(client.clone(), RetryPolicy::default());

    let err = pipeline.run_batch(&[]).await.unwrap_err();

    assert_eq!(err, BatchError::Input(InputError::Empty));
    assert_eq!(client.total.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn run_topic_returns_validated_keywords() {
    let pipeline = KeywordPipeline::new(Arc::new(TopicClient::default()), RetryPolicy::default());

    let keywords = pipeline.run_topic("trail shoes").await.unwrap();

    assert_eq!(keywords.len(), 2);
    assert_eq!(keywords[0].keyword(), "best trail shoes for beginners");
    assert_eq!(keywords[1].search_volume(), 800);
}

/// A client that panics stands in for a programmer error inside a topic task.
struct PanickingClient;

#[async_trait]
impl GenerationClient for PanickingClient {
    async fn generate(&self, topic: &str) -> Result<String, ServiceFailure> {
        if topic == "boom" {
            panic!("unexpected state");
        }
        Ok(keywords_for(topic))
    }
}

#[tokio::test]
async fn panicking_task_is_an_internal_error() {
    let pipeline = KeywordPipeline::new(Arc::new(PanickingClient), RetryPolicy::default());

    let err = pipeline
        .run_batch(&topics(&["fine", "boom"]))
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::Internal(_)));
}
