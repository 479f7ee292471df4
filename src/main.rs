// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Devstats API Server
//!
//! Aggregates public developer statistics from GitHub and Bitbucket and
//! merges them per logical user.

use devstats::{
    config::Config,
    db::InMemoryUserStore,
    services::{ProfileBuilder, ProfileRegistry},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Devstats API");

    tracing::info!(
        github = %config.github_api_url,
        github_token = config.github_token.is_some(),
        bitbucket = %config.bitbucket_api_url,
        bitbucket_token = config.bitbucket_token.is_some(),
        fetch_concurrency = config.fetch_concurrency,
        "Provider clients configured"
    );
    let builder = ProfileBuilder::from_config(&config);

    // Users live in process memory only
    let store = InMemoryUserStore::new();
    let registry = ProfileRegistry::new(Arc::new(store), Arc::new(builder));

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        registry,
    });

    // Build router
    let app = devstats::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("devstats=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
