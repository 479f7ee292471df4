// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bitbucket Cloud API client.
//!
//! Bitbucket exposes neither watcher nor issue counts on the repository
//! list, so those cost one request per repository. Accounts are either
//! users or teams, with followers under different endpoints.

use crate::error::AppError;
use crate::models::repository::normalize_language;
use crate::models::{AccountKind, ProfileStats, Provider, RepositoryRecord};
use crate::services::aggregate::{self, BitbucketCounts};
use crate::services::http::{segment, ProviderHttp};
use crate::services::pagination::{collect_pages, Page};
use futures_util::{stream, StreamExt, TryStreamExt};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;

/// Bitbucket API client.
#[derive(Clone)]
pub struct BitbucketClient {
    http: ProviderHttp,
    base_url: String,
    concurrency: usize,
}

impl BitbucketClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, concurrency: usize) -> Self {
        Self {
            http: ProviderHttp::new(Provider::Bitbucket, token),
            base_url: base_url.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Build the complete profile for one account.
    pub async fn fetch_profile(&self, handle: &str) -> Result<ProfileStats, AppError> {
        let repos = self.list_repositories(handle).await?;
        tracing::debug!(handle, repositories = repos.len(), "Bitbucket repositories listed");

        let summary = aggregate::summarize(&repos);

        let (followers, commits, open_issues, watchers) = tokio::try_join!(
            async {
                let kind = self.resolve_account_kind(handle).await?;
                self.follower_count(handle, kind).await
            },
            self.commit_count(handle, &repos),
            self.open_issue_count(handle, &repos),
            self.watcher_count(handle, &repos),
        )?;

        Ok(summary.into_bitbucket_profile(BitbucketCounts {
            followers,
            commits,
            open_issues,
            watchers,
        }))
    }

    /// List all repositories for a user or team.
    pub async fn list_repositories(&self, handle: &str) -> Result<Vec<RepositoryRecord>, AppError> {
        let first = format!("{}/repositories/{}", self.base_url, segment(handle));
        let repos: Vec<BitbucketRepository> = self.collect_values(first, "repositories").await?;
        Ok(repos.into_iter().map(RepositoryRecord::from).collect())
    }

    /// Probe the user endpoint, then the team endpoint.
    pub async fn resolve_account_kind(&self, handle: &str) -> Result<AccountKind, AppError> {
        for kind in [AccountKind::Individual, AccountKind::Group] {
            let url = format!("{}/{}/{}", self.base_url, collection(kind), segment(handle));
            if self.http.probe(&url, "account").await? {
                tracing::debug!(handle, kind = ?kind, "Bitbucket account resolved");
                return Ok(kind);
            }
        }

        Err(AppError::UnresolvedAccount {
            provider: Provider::Bitbucket,
            handle: handle.to_string(),
        })
    }

    pub async fn follower_count(&self, handle: &str, kind: AccountKind) -> Result<u64, AppError> {
        let url = format!(
            "{}/{}/{}/followers",
            self.base_url,
            collection(kind),
            segment(handle)
        );
        self.sized(&url, &[], "followers").await
    }

    /// Total commits across source repositories, each walked page by page.
    pub async fn commit_count(
        &self,
        handle: &str,
        repos: &[RepositoryRecord],
    ) -> Result<u64, AppError> {
        let slugs = slugs(aggregate::commit_eligible(repos));
        self.sum_per_repo(slugs, |slug| async move {
            let first = format!(
                "{}/repositories/{}/{}/commits",
                self.base_url,
                segment(handle),
                segment(&slug)
            );
            let commits: Vec<IgnoredAny> = self
                .collect_values(first, &format!("commits for {}", slug))
                .await?;
            Ok::<_, AppError>(commits.len() as u64)
        })
        .await
    }

    /// Open issues across source repositories with an issue tracker.
    pub async fn open_issue_count(
        &self,
        handle: &str,
        repos: &[RepositoryRecord],
    ) -> Result<u64, AppError> {
        let slugs = slugs(aggregate::issue_eligible(repos));
        self.sum_per_repo(slugs, |slug| async move {
            let url = format!(
                "{}/repositories/{}/{}/issues",
                self.base_url,
                segment(handle),
                segment(&slug)
            );
            self.sized(
                &url,
                &[("q", "state=\"open\"")],
                &format!("open issues for {}", slug),
            )
            .await
        })
        .await
    }

    /// Watchers across every repository, forks included.
    pub async fn watcher_count(
        &self,
        handle: &str,
        repos: &[RepositoryRecord],
    ) -> Result<u64, AppError> {
        let slugs = slugs(repos.iter());
        self.sum_per_repo(slugs, |slug| async move {
            let url = format!(
                "{}/repositories/{}/{}/watchers",
                self.base_url,
                segment(handle),
                segment(&slug)
            );
            self.sized(&url, &[], &format!("watchers for {}", slug)).await
        })
        .await
    }

    /// Run one counting request per repository, bounded, and sum the results.
    async fn sum_per_repo<F, Fut>(&self, slugs: Vec<String>, count: F) -> Result<u64, AppError>
    where
        F: FnMut(String) -> Fut,
        Fut: std::future::Future<Output = Result<u64, AppError>>,
    {
        stream::iter(slugs)
            .map(count)
            .buffer_unordered(self.concurrency)
            .try_fold(0u64, |total, n| async move {
                Ok::<_, AppError>(total.saturating_add(n))
            })
            .await
    }

    /// Walk a paginated `{values, next}` listing.
    async fn collect_values<T: DeserializeOwned>(
        &self,
        first: String,
        resource: &str,
    ) -> Result<Vec<T>, AppError> {
        collect_pages(first, |url| async move {
            let page: Paginated<T> = self.http.get_json(&url, &[], resource).await?;
            Ok::<_, AppError>(Page {
                items: page.values,
                next: page.next,
            })
        })
        .await
    }

    /// Read the `size` field of a listing response.
    async fn sized(
        &self,
        url: &str,
        query: &[(&str, &str)],
        resource: &str,
    ) -> Result<u64, AppError> {
        let body: ListingSize = self.http.get_json(url, query, resource).await?;
        Ok(body.size)
    }
}

fn collection(kind: AccountKind) -> &'static str {
    match kind {
        AccountKind::Individual => "users",
        AccountKind::Group => "teams",
    }
}

fn slugs<'a>(repos: impl Iterator<Item = &'a RepositoryRecord>) -> Vec<String> {
    repos.map(|repo| repo.handle.clone()).collect()
}

/// Paginated response envelope.
#[derive(Debug, Deserialize)]
struct Paginated<T> {
    values: Vec<T>,
    next: Option<String>,
}

/// Listing response of which only the total is needed.
#[derive(Debug, Deserialize)]
struct ListingSize {
    size: u64,
}

/// Repository as returned by `GET /repositories/{workspace}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BitbucketRepository {
    pub slug: String,
    #[serde(default)]
    pub language: Option<String>,
    pub size: u64,
    pub has_issues: bool,
    /// Forks carry a `parent` key; its value is not inspected.
    #[serde(rename = "parent", default, deserialize_with = "key_present")]
    pub has_parent: bool,
}

/// True whenever the field appears, whatever its value (even `null`).
fn key_present<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    IgnoredAny::deserialize(deserializer).map(|_| true)
}

impl From<BitbucketRepository> for RepositoryRecord {
    fn from(repo: BitbucketRepository) -> Self {
        RepositoryRecord {
            is_fork: repo.has_parent,
            language: normalize_language(repo.language.as_deref()),
            handle: repo.slug,
            size: repo.size,
            has_issues: repo.has_issues,
            ..Default::default()
        }
    }
}
