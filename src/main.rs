use std::path::Path;
use std::time::Duration;

use room_scout::config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
use room_scout::dedup::SeenLog;
use room_scout::extraction::OpenAiExtractor;
use room_scout::feed::{FeedParams, FeedSource, GroupBrowserFeed};
use room_scout::notify::{RetryingSink, WebhookSink};
use room_scout::pipeline::Pipeline;
use tracing::{error, info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 Room Scout - rental listing watcher");
    info!("======================================");

    let config = match Config::load(Path::new(DEFAULT_CONFIG_PATH)) {
        Ok(config) => config,
        Err(err @ ConfigError::Missing { .. }) => {
            error!("{err}");
            error!("Fill in the template, then run again.");
            std::process::exit(1);
        }
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    let seen = SeenLog::open(&config.seen_log_path)?;
    info!(
        "Dedup store ready with {} known listings ({})",
        seen.len(),
        config.seen_log_path.display()
    );

    let feed = GroupBrowserFeed::new(FeedParams::new(
        &config.group_url,
        &config.session_cookie,
        &config.c_user_cookie,
    ))?;

    info!("Collecting listings from {}...", feed.source_name());
    let ads = feed.collect().await?;
    info!("Collected {} raw ads", ads.len());

    let extractor = OpenAiExtractor::new(&config.openai_api_key)?;
    let sink = RetryingSink::new(
        WebhookSink::new(&config.webhook_url)?,
        3,
        Duration::from_secs(1),
    );

    let mut pipeline = Pipeline::new(seen, extractor, sink);
    let stats = pipeline.run(&ads).await?;

    info!("✅ Run complete\n{stats}");

    Ok(())
}
