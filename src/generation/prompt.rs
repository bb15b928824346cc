// Prompt construction for keyword generation.

/// Number of long-tail keywords requested per topic.
pub const KEYWORDS_PER_TOPIC: usize = 10;

/// Build the instruction sent to the model for one primary keyword.
pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"Generate {KEYWORDS_PER_TOPIC} creative, data-driven long-tail keywords for the primary keyword: "{topic}".

Requirements:
1. Stay realistic: follow real search patterns and user intent.
2. Mix these keyword types:
   - Questions (how to, what is, why ...)
   - Comparisons (best, top, vs ...)
   - Location-specific (near me, in [city] ...)
   - Problem-solving (fix, solution, guide ...)
3. Cover informational, transactional, navigational and commercial intent.
4. Estimate search volume from phrase length, commercial intent and seasonality.
5. Estimate difficulty from competition, domain authority needed and content quality required.

Return only a JSON array of objects with "keyword", "searchVolume" (0-100000) and "difficulty" (0-100).
Example: [{{"keyword":"best running shoes for beginners","searchVolume":1200,"difficulty":45}}]"#
    )
}
