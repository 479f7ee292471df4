// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use devstats::config::Config;
use devstats::db::InMemoryUserStore;
use devstats::error::AppError;
use devstats::models::{ProfileKey, ProfileStats, Provider};
use devstats::routes::create_router;
use devstats::services::{ProfileFetcher, ProfileRegistry};
use devstats::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fetcher returning canned profiles and counting builds per account.
#[derive(Default)]
pub struct StubFetcher {
    profiles: HashMap<ProfileKey, ProfileStats>,
    calls: Mutex<HashMap<ProfileKey, usize>>,
    total_calls: AtomicUsize,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, key: ProfileKey, stats: ProfileStats) -> Self {
        self.profiles.insert(key, stats);
        self
    }

    /// Make every build take a while, to widen race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls_for(&self, key: &ProfileKey) -> usize {
        self.calls.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileFetcher for StubFetcher {
    async fn fetch_profile(&self, key: &ProfileKey) -> Result<ProfileStats, AppError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().unwrap().entry(key.clone()).or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        // Unknown accounts behave like a provider 404
        self.profiles
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::Upstream {
                provider: key.provider,
                resource: "repositories".to_string(),
                status: 404,
            })
    }
}

#[allow(dead_code)]
pub fn github(handle: &str) -> ProfileKey {
    ProfileKey::new(Provider::Github, handle)
}

#[allow(dead_code)]
pub fn bitbucket(handle: &str) -> ProfileKey {
    ProfileKey::new(Provider::Bitbucket, handle)
}

#[allow(dead_code)]
pub fn registry_with(fetcher: Arc<StubFetcher>) -> ProfileRegistry {
    ProfileRegistry::new(Arc::new(InMemoryUserStore::new()), fetcher)
}

/// Create a test app backed by a stub fetcher.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(fetcher: Arc<StubFetcher>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::default(),
        registry: registry_with(fetcher),
    });
    (create_router(state.clone()), state)
}

#[allow(dead_code)]
pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
