// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile cache keyed by provider account.
//!
//! Entries are never invalidated: handles name stable external accounts for
//! the lifetime of the process. Population is single-flight per key.

use crate::error::AppError;
use crate::models::{ProfileKey, ProfileStats};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cached profiles plus per-key build locks.
#[derive(Default)]
pub struct ProfileCache {
    entries: DashMap<ProfileKey, Arc<ProfileStats>>,
    /// Per-key mutex so concurrent first uses share one build.
    build_locks: DashMap<ProfileKey, Arc<Mutex<()>>>,
}

impl ProfileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ProfileKey) -> Option<Arc<ProfileStats>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the cached profile, building it on first use.
    ///
    /// At most one build per key is in flight. A failed build stores nothing,
    /// so the next caller tries again.
    pub async fn get_or_build<F, Fut>(
        &self,
        key: &ProfileKey,
        build: F,
    ) -> Result<Arc<ProfileStats>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ProfileStats, AppError>>,
    {
        if let Some(hit) = self.get(key) {
            tracing::debug!(profile = %key, "Profile cache hit");
            return Ok(hit);
        }

        let lock = self
            .build_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();

        let _guard = lock.lock().await;

        // Another task may have built it while we waited
        if let Some(hit) = self.get(key) {
            tracing::debug!(profile = %key, "Profile built by concurrent request");
            return Ok(hit);
        }

        let stats = Arc::new(build().await?);
        self.entries.insert(key.clone(), Arc::clone(&stats));
        Ok(stats)
    }
}
