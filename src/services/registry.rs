// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Logical user registry.
//!
//! Handles the user workflow:
//! 1. Create/delete logical users
//! 2. Attach provider accounts (building and caching their profiles)
//! 3. Detach accounts (their cached profiles stay for reuse)
//! 4. Read the merged profile of everything attached to a user

use crate::db::{ProfileCache, UserStore};
use crate::error::{AppError, Result};
use crate::models::{ProfileKey, ProfileStats};
use crate::services::ProfileFetcher;
use futures_util::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;

/// Max attached profiles resolved at once during a read.
const MAX_CONCURRENT_PROFILE_READS: usize = 4;

/// Coordinates the user store, the profile cache and profile building.
#[derive(Clone)]
pub struct ProfileRegistry {
    store: Arc<dyn UserStore>,
    fetcher: Arc<dyn ProfileFetcher>,
    cache: Arc<ProfileCache>,
}

impl ProfileRegistry {
    pub fn new(store: Arc<dyn UserStore>, fetcher: Arc<dyn ProfileFetcher>) -> Self {
        Self {
            store,
            fetcher,
            cache: Arc::new(ProfileCache::new()),
        }
    }

    pub fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    pub fn create_user(&self, username: &str) -> Result<()> {
        self.store.create_user(username)?;
        tracing::info!(username, "User created");
        Ok(())
    }

    pub fn delete_user(&self, username: &str) -> Result<()> {
        let user = self.store.delete_user(username)?;
        tracing::info!(
            username,
            released = user.attached.len(),
            "User deleted"
        );
        Ok(())
    }

    /// Attach a provider account to a user.
    ///
    /// The account's profile is built on first use. A build failure leaves
    /// the user unchanged.
    pub async fn attach(&self, username: &str, key: ProfileKey) -> Result<()> {
        if self.store.get_user(username).is_none() {
            return Err(AppError::NotFound(format!("user {} not found", username)));
        }

        // Cheap check first so a doomed attach never reaches the provider
        if let Some(owner) = self.store.owner_of(&key) {
            tracing::warn!(username, profile = %key, owner = %owner, "Account already attached");
            return Err(AppError::Conflict(format!(
                "{} profile {} already attached to {}",
                key.provider, key.handle, owner
            )));
        }

        self.profile(&key).await?;

        // Re-checked under the store lock; a concurrent attach may have won
        self.store.attach(username, key.clone())?;
        tracing::info!(username, profile = %key, "Account attached");
        Ok(())
    }

    pub fn detach(&self, username: &str, key: &ProfileKey) -> Result<()> {
        self.store.detach(username, key)?;
        tracing::info!(username, profile = %key, "Account detached");
        Ok(())
    }

    /// Merge the profiles of every account attached to a user.
    pub async fn merged_profile(&self, username: &str) -> Result<ProfileStats> {
        let user = self
            .store
            .get_user(username)
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", username)))?;

        let profiles: Vec<Arc<ProfileStats>> = stream::iter(user.attached)
            .map(|key| async move { self.profile(&key).await })
            .buffered(MAX_CONCURRENT_PROFILE_READS)
            .try_collect()
            .await?;

        Ok(ProfileStats::merge(profiles.iter().map(Arc::as_ref)))
    }

    /// Cached profile for one account, built if absent.
    async fn profile(&self, key: &ProfileKey) -> Result<Arc<ProfileStats>> {
        self.cache
            .get_or_build(key, || self.fetcher.fetch_profile(key))
            .await
    }
}
