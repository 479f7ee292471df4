// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile building across providers.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{ProfileKey, ProfileStats, Provider};
use crate::services::{BitbucketClient, GithubClient};
use async_trait::async_trait;
use std::time::Instant;

/// Produces the statistics for one provider account.
///
/// Implementations either return a complete profile or an error; a partial
/// profile is never returned.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch_profile(&self, key: &ProfileKey) -> Result<ProfileStats, AppError>;
}

/// Dispatches to the provider client named by the key.
#[derive(Clone)]
pub struct ProfileBuilder {
    github: GithubClient,
    bitbucket: BitbucketClient,
}

impl ProfileBuilder {
    pub fn new(github: GithubClient, bitbucket: BitbucketClient) -> Self {
        Self { github, bitbucket }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            GithubClient::new(
                config.github_api_url.clone(),
                config.github_token.clone(),
                config.fetch_concurrency,
            ),
            BitbucketClient::new(
                config.bitbucket_api_url.clone(),
                config.bitbucket_token.clone(),
                config.fetch_concurrency,
            ),
        )
    }
}

#[async_trait]
impl ProfileFetcher for ProfileBuilder {
    async fn fetch_profile(&self, key: &ProfileKey) -> Result<ProfileStats, AppError> {
        tracing::info!(provider = %key.provider, handle = %key.handle, "Building profile");
        let started = Instant::now();

        let result = match key.provider {
            Provider::Github => self.github.fetch_profile(&key.handle).await,
            Provider::Bitbucket => self.bitbucket.fetch_profile(&key.handle).await,
        };

        match &result {
            Ok(stats) => tracing::info!(
                provider = %key.provider,
                handle = %key.handle,
                sources = stats.public_source_repositories,
                forks = stats.public_fork_repositories,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Profile built"
            ),
            Err(e) => tracing::warn!(
                provider = %key.provider,
                handle = %key.handle,
                error = %e,
                "Profile build failed"
            ),
        }

        result
    }
}
