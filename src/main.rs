//! LRU TTL Cache demo
//!
//! Walks through eviction, promotion and expiry on a small cache and prints
//! what it observes.

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_ttl_cache::{Cache, CacheConfig};

/// Entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables (capacity defaults to 2 here)
/// 3. Run the eviction scenario and print each lookup
/// 4. Print statistics and shut the sweeper down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = CacheConfig::from_env();
    if std::env::var("CACHE_CAPACITY").is_err() {
        config.capacity = 2;
    }
    info!(
        "Configuration loaded: capacity={}, cleanup_interval={:?}",
        config.capacity, config.cleanup_interval
    );

    let cache: Cache<String, String> =
        Cache::from_config(&config).context("failed to create cache")?;

    cache.set(
        "a".to_string(),
        "apple".to_string(),
        Some(Duration::from_secs(3)),
    );
    cache.set("b".to_string(), "banana".to_string(), None);
    cache.set("c".to_string(), "cherry".to_string(), None);

    for key in ["a", "b", "c"] {
        match cache.get(key) {
            Some(value) => println!("{key}: {value}"),
            None => println!("{key}: not found"),
        }
    }

    let stats = serde_json::to_string_pretty(&cache.stats())?;
    println!("{stats}");

    cache.shutdown().await?;
    info!("Demo complete");
    Ok(())
}
