use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use tailfinder::config::Config;
use tailfinder::generation::gemini::GeminiClient;
use tailfinder::output::{csv, terminal};
use tailfinder::pipeline::{split_topic_list, KeywordPipeline};

/// Tailfinder: long-tail keyword discovery.
///
/// Expands primary keywords into realistic long-tail keywords with estimated
/// search volume and ranking difficulty.
#[derive(Parser)]
#[command(name = "tailfinder", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate long-tail keywords for one or more primary keywords
    Generate {
        /// Primary keywords (each argument may be a comma-separated list)
        #[arg(required = true)]
        topics: Vec<String>,

        /// Export all keywords as CSV to PATH (a dated filename if PATH is omitted)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        csv: Option<Option<PathBuf>>,

        /// Print the results as JSON instead of the terminal report
        #[arg(long)]
        json: bool,
    },

    /// Serve the keyword API over HTTP
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 3000)
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Structured logging goes to stderr so reports and JSON stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tailfinder=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            topics,
            csv: csv_path,
            json,
        } => {
            let config = Config::load()?;
            config.require_gemini()?;

            let topics: Vec<String> = topics.iter().flat_map(|t| split_topic_list(t)).collect();
            if topics.is_empty() {
                anyhow::bail!("Please provide at least one primary keyword");
            }

            let pipeline = create_pipeline(&config)?;

            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner().template("  {spinner} {msg}")?);
            pb.set_message(format!("Generating keywords for {} topics...", topics.len()));
            pb.enable_steady_tick(Duration::from_millis(120));

            let batch = pipeline.run_batch(&topics).await;
            pb.finish_and_clear();
            let batch = batch?;

            if json {
                let body = serde_json::json!({ "results": serde_json::to_value(&batch)? });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                terminal::display_batch(&batch);
            }

            if let Some(path) = csv_path {
                let path = path
                    .unwrap_or_else(|| csv::default_filename(chrono::Local::now().date_naive()));
                let rows = csv::write_batch(&batch, &path)?;
                println!(
                    "{} Exported {} keywords to {}",
                    "✓".green(),
                    rows,
                    path.display()
                );
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            config.require_gemini()?;
            let pipeline = create_pipeline(&config)?;
            tailfinder::web::run_server(pipeline, port, &bind).await?;
        }
    }

    Ok(())
}

/// Build the keyword pipeline from configuration.
fn create_pipeline(config: &Config) -> Result<KeywordPipeline> {
    let client = GeminiClient::new(
        &config.gemini_api_url,
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.request_timeout,
    )?;
    info!(
        model = client.model(),
        max_attempts = config.max_attempts,
        backoff_ms = config.backoff_unit.as_millis() as u64,
        "Using Gemini keyword generator"
    );
    Ok(KeywordPipeline::new(Arc::new(client), config.retry_policy()))
}
