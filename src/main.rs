use std::sync::Arc;

use anyhow::Context;
use today_matches_server::api::Api;
use today_matches_server::clock::SystemClock;
use today_matches_server::config_handler;
use today_matches_server::match_cache::MatchCache;
use today_matches_server::match_extractor::MatchExtractor;
use today_matches_server::rest_client::RestClient;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if std::env::var_os("RUST_LOG").is_none() {
        // Set the RUST_LOG, if it hasn't been explicitly defined
        std::env::set_var("RUST_LOG", "info,hyper=info")
    }

    // Configure a custom event formatter
    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_target(false)
        .with_ansi(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .compact();
    tracing_subscriber::fmt()
        .event_format(format)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = config_handler::get_config()?;

    let refresh_interval = config.get_refresh_interval()?;
    let rest_client = RestClient::new(&config).context("Failed to create http client")?;
    let match_cache = MatchCache::new(
        MatchExtractor::new(Arc::new(rest_client)),
        Arc::new(SystemClock),
        refresh_interval,
    );

    Api::serve(config.port, &config.route, match_cache).await
}
