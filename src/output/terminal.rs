// Colored terminal output for keyword batches.
//
// main.rs delegates all report formatting here so the command handlers stay
// focused on running the pipeline.

use colored::Colorize;

use crate::models::{BatchResult, DifficultyTier, TopicResult};

/// Display every topic in a batch, in input order.
pub fn display_batch(batch: &BatchResult) {
    for result in batch.results() {
        display_topic(result);
    }

    let failed = batch.failed_count();
    let keywords = batch.all_keywords().count();
    println!(
        "  {} keywords across {} topics",
        keywords.to_string().bold(),
        batch.len()
    );
    if failed > 0 {
        println!("  {} {} topics failed", "!".bright_red(), failed);
    }
    println!();
}

/// Display one topic's keywords, or its error.
pub fn display_topic(result: &TopicResult) {
    println!(
        "\n{}",
        format!("=== Long-tail keywords for: {} ===", result.topic()).bold()
    );
    println!();

    if let Some(error) = result.error() {
        println!("  {} {}", "Error:".red().bold(), error);
        return;
    }
    if result.keywords().is_empty() {
        println!("  {}", "No keywords generated for this term.".dimmed());
        return;
    }

    println!(
        "  {:>3}  {:<60} {:>9}  {:>10}",
        "#".dimmed(),
        "Keyword".dimmed(),
        "Volume".dimmed(),
        "Difficulty".dimmed(),
    );
    println!("  {}", "-".repeat(88).dimmed());

    for (i, metric) in result.keywords().iter().enumerate() {
        let tier = metric.difficulty_tier();
        let difficulty = format!("{:>3} {:<6}", metric.difficulty(), tier.as_str());
        println!(
            "  {:>3}. {:<60} {:>9}  {}",
            i + 1,
            super::truncate_chars(metric.keyword(), 57),
            super::format_thousands(metric.search_volume()),
            colorize_difficulty(tier, &difficulty),
        );
    }
}

/// Colorize a difficulty label by tier.
fn colorize_difficulty(tier: DifficultyTier, label: &str) -> colored::ColoredString {
    match tier {
        DifficultyTier::Hard => label.red(),
        DifficultyTier::Medium => label.yellow(),
        DifficultyTier::Easy => label.green(),
    }
}
