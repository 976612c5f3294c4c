use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use route_arbitrage::{
    config::AppConfig,
    execution::LoggingSink,
    feed::{self, CachedBook},
    runner, utils,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".into());
    let config = AppConfig::load(&config_path)?;
    tracing::info!(
        %config_path,
        markets = config.markets.len(),
        routes = config.routes.len(),
        poll_secs = config.poll_interval.as_secs(),
        "[INIT] route-arbitrage starting"
    );

    // One book watcher per configured market; the evaluator reads whatever
    // snapshot is latest at cycle time.
    let mut books = HashMap::new();
    for market in &config.markets {
        let (tx, rx) = watch::channel(None);
        let symbol = utils::feed_symbol(market);
        feed::spawn_book_watcher(&config.feed_endpoint, &symbol, tx).await?;
        books.insert(market.clone(), rx);
        tracing::info!(%market, %symbol, "[INIT] book watcher started");
    }
    let source = CachedBook::new(books);
    let sink = LoggingSink;

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    runner::run_loop(
        &config.routes,
        &source,
        &sink,
        &config.params,
        config.poll_interval,
        shutdown,
    )
    .await;

    Ok(())
}
