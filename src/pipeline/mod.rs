// Keyword pipeline: generate -> sanitize -> validate, retried per topic and
// fanned out across a batch.

pub mod batch;
pub mod retry;
pub mod sanitize;
pub mod validate;

pub use batch::{parse_topics, split_topic_list, KeywordPipeline};
pub use retry::RetryPolicy;
