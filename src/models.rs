// Data models: the records that flow out of the keyword pipeline.
//
// All three are built once per request and never mutated afterwards, so the
// fields are private and only reachable through constructors and accessors.
// Serialized field names follow the HTTP contract (camelCase).

use serde::Serialize;

use crate::error::ExhaustedRetries;

/// Upper bound (inclusive) for a keyword's monthly search volume.
pub const MAX_SEARCH_VOLUME: i64 = 100_000;

/// Upper bound (inclusive) for a keyword's ranking difficulty.
pub const MAX_DIFFICULTY: i64 = 100;

/// Why a candidate entry was rejected by the checked constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    NotAnObject,
    MissingKeyword,
    EmptyKeyword,
    MissingSearchVolume,
    SearchVolumeNotInteger,
    SearchVolumeOutOfRange,
    MissingDifficulty,
    DifficultyNotInteger,
    DifficultyOutOfRange,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::NotAnObject => "not_an_object",
            DropReason::MissingKeyword => "missing_keyword",
            DropReason::EmptyKeyword => "empty_keyword",
            DropReason::MissingSearchVolume => "missing_search_volume",
            DropReason::SearchVolumeNotInteger => "search_volume_not_integer",
            DropReason::SearchVolumeOutOfRange => "search_volume_out_of_range",
            DropReason::MissingDifficulty => "missing_difficulty",
            DropReason::DifficultyNotInteger => "difficulty_not_integer",
            DropReason::DifficultyOutOfRange => "difficulty_out_of_range",
        }
    }
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated long-tail keyword with its estimated metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMetric {
    keyword: String,
    search_volume: u32,
    difficulty: u8,
}

impl KeywordMetric {
    /// Build a metric, rejecting anything outside the contract.
    ///
    /// Out-of-range values are never clamped.
    pub fn new(
        keyword: impl Into<String>,
        search_volume: i64,
        difficulty: i64,
    ) -> Result<Self, DropReason> {
        let keyword = keyword.into();
        if keyword.is_empty() {
            return Err(DropReason::EmptyKeyword);
        }
        if !(0..=MAX_SEARCH_VOLUME).contains(&search_volume) {
            return Err(DropReason::SearchVolumeOutOfRange);
        }
        if !(0..=MAX_DIFFICULTY).contains(&difficulty) {
            return Err(DropReason::DifficultyOutOfRange);
        }
        Ok(Self {
            keyword,
            search_volume: search_volume as u32,
            difficulty: difficulty as u8,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn search_volume(&self) -> u32 {
        self.search_volume
    }

    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    pub fn difficulty_tier(&self) -> DifficultyTier {
        DifficultyTier::from_difficulty(self.difficulty)
    }
}

/// Coarse difficulty buckets used when rendering reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    pub fn from_difficulty(difficulty: u8) -> Self {
        match difficulty {
            d if d >= 70 => DifficultyTier::Hard,
            d if d >= 30 => DifficultyTier::Medium,
            _ => DifficultyTier::Easy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Medium => "Medium",
            DifficultyTier::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome for one topic in a batch.
///
/// `error` is set exactly when the pipeline gave up on the topic, in which
/// case `keywords` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicResult {
    #[serde(rename = "primaryKeyword")]
    topic: String,
    keywords: Vec<KeywordMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TopicResult {
    pub fn success(topic: impl Into<String>, keywords: Vec<KeywordMetric>) -> Self {
        Self {
            topic: topic.into(),
            keywords,
            error: None,
        }
    }

    pub fn failure(topic: impl Into<String>, error: &ExhaustedRetries) -> Self {
        Self {
            topic: topic.into(),
            keywords: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn keywords(&self) -> &[KeywordMetric] {
        &self.keywords
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// One TopicResult per input topic, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BatchResult(Vec<TopicResult>);

impl BatchResult {
    pub(crate) fn new(results: Vec<TopicResult>) -> Self {
        Self(results)
    }

    pub fn results(&self) -> &[TopicResult] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every keyword across all topics, in topic order.
    pub fn all_keywords(&self) -> impl Iterator<Item = &KeywordMetric> {
        self.0.iter().flat_map(|r| r.keywords.iter())
    }

    pub fn failed_count(&self) -> usize {
        self.0.iter().filter(|r| !r.is_success()).count()
    }
}
