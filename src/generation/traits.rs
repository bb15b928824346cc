// GenerationClient trait and the fixed sampling configuration.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ServiceFailure;

/// Sampling parameters sent with every request.
///
/// These are fixed for the whole process; callers cannot tune them per
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }
}

/// Produces raw model text for a topic.
///
/// Implementations must be async because the real provider is an HTTP API,
/// and `Send + Sync` because one client is shared by every topic task.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// One call to the provider for `topic`. Any failure, whatever the cause,
    /// is reported as a `ServiceFailure`.
    async fn generate(&self, topic: &str) -> Result<String, ServiceFailure>;
}
