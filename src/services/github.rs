// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub API client.
//!
//! Handles:
//! - Repository listing, paginated via the `Link` header
//! - Counting followers, starred repositories and commits with the
//!   one-item-per-page trick (the `last` link's page number is the count)
//! - Assembling a full `ProfileStats` for one account

use crate::error::AppError;
use crate::models::repository::normalize_language;
use crate::models::{ProfileStats, Provider, RepositoryRecord};
use crate::services::aggregate::{self, GithubCounts};
use crate::services::http::{segment, ProviderHttp};
use crate::services::pagination::{collect_pages, Page};
use futures_util::{stream, StreamExt, TryStreamExt};
use reqwest::header::LINK;
use serde::Deserialize;

/// Topics ship with the mercy preview media type.
const ACCEPT_PREVIEW: &str = "application/vnd.github.mercy-preview+json";
const REPOS_PER_PAGE: &str = "100";

/// GitHub API client.
#[derive(Clone)]
pub struct GithubClient {
    http: ProviderHttp,
    base_url: String,
    concurrency: usize,
}

impl GithubClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, concurrency: usize) -> Self {
        Self {
            http: ProviderHttp::new(Provider::Github, token).with_accept(ACCEPT_PREVIEW),
            base_url: base_url.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Build the complete profile for one account.
    pub async fn fetch_profile(&self, handle: &str) -> Result<ProfileStats, AppError> {
        let repos = self.list_repositories(handle).await?;
        tracing::debug!(handle, repositories = repos.len(), "GitHub repositories listed");

        let summary = aggregate::summarize(&repos);

        // Independent reads; the first failure drops the rest
        let (followers, starred, commits) = tokio::try_join!(
            self.follower_count(handle),
            self.starred_count(handle),
            self.commit_count(handle, &repos),
        )?;

        Ok(summary.into_github_profile(GithubCounts {
            followers,
            starred,
            commits,
        }))
    }

    /// List all public repositories for an account.
    pub async fn list_repositories(&self, handle: &str) -> Result<Vec<RepositoryRecord>, AppError> {
        let first = format!(
            "{}/users/{}/repos?per_page={}",
            self.base_url,
            segment(handle),
            REPOS_PER_PAGE
        );

        let repos: Vec<GithubRepository> = collect_pages(first, |url| async move {
            let response = self.http.get(&url, &[], "repositories").await?;
            let next = link_header(&response).next;
            let items = self.http.decode(response, "repositories").await?;
            Ok::<_, AppError>(Page { items, next })
        })
        .await?;

        Ok(repos.into_iter().map(RepositoryRecord::from).collect())
    }

    pub async fn follower_count(&self, handle: &str) -> Result<u64, AppError> {
        let url = format!("{}/users/{}/followers", self.base_url, segment(handle));
        self.count_items(&url, "followers").await
    }

    /// Number of repositories the account has starred.
    pub async fn starred_count(&self, handle: &str) -> Result<u64, AppError> {
        let url = format!("{}/users/{}/starred", self.base_url, segment(handle));
        self.count_items(&url, "starred repositories").await
    }

    /// Sum of commit counts over the account's source repositories.
    pub async fn commit_count(
        &self,
        handle: &str,
        repos: &[RepositoryRecord],
    ) -> Result<u64, AppError> {
        let names: Vec<String> = aggregate::commit_eligible(repos)
            .map(|repo| repo.handle.clone())
            .collect();

        stream::iter(names)
            .map(|repo| async move { self.repo_commit_count(handle, &repo).await })
            .buffer_unordered(self.concurrency)
            .try_fold(0u64, |total, count| async move {
                Ok::<_, AppError>(total.saturating_add(count))
            })
            .await
    }

    async fn repo_commit_count(&self, handle: &str, repo: &str) -> Result<u64, AppError> {
        let url = format!(
            "{}/repos/{}/{}/commits",
            self.base_url,
            segment(handle),
            segment(repo)
        );
        self.count_items(&url, &format!("commits for {}", repo)).await
    }

    /// Count a listing by requesting one item per page.
    async fn count_items(&self, url: &str, resource: &str) -> Result<u64, AppError> {
        let response = self.http.get(url, &[("per_page", "1")], resource).await?;

        if let Some(last) = link_header(&response).last {
            return last_page_number(&last).ok_or_else(|| {
                self.http
                    .transport_error(resource, format!("no page number in last link {}", last))
            });
        }

        // No `last` link: everything fit on this page
        let items: Vec<serde::de::IgnoredAny> = self.http.decode(response, resource).await?;
        Ok(items.len() as u64)
    }
}

/// Repository as returned by `GET /users/{user}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepository {
    pub name: String,
    pub fork: bool,
    pub language: Option<String>,
    pub size: u64,
    pub has_issues: bool,
    pub open_issues_count: u64,
    pub stargazers_count: u64,
    pub watchers_count: u64,
    /// Omitted by the API when the repository has none.
    #[serde(default)]
    pub topics: Vec<String>,
}

impl From<GithubRepository> for RepositoryRecord {
    fn from(repo: GithubRepository) -> Self {
        RepositoryRecord {
            language: normalize_language(repo.language.as_deref()),
            handle: repo.name,
            is_fork: repo.fork,
            size: repo.size,
            has_issues: repo.has_issues,
            open_issue_count: repo.open_issues_count,
            star_count: repo.stargazers_count,
            watcher_count: repo.watchers_count,
            topics: repo.topics.into_iter().collect(),
        }
    }
}

/// Relations parsed from a `Link` header.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Links {
    pub next: Option<String>,
    pub last: Option<String>,
}

fn link_header(response: &reqwest::Response) -> Links {
    response
        .headers()
        .get(LINK)
        .and_then(|value| value.to_str().ok())
        .map(parse_link_header)
        .unwrap_or_default()
}

/// Parse `<url>; rel="next", <url>; rel="last"`.
pub fn parse_link_header(value: &str) -> Links {
    let mut links = Links::default();

    for entry in value.split(',') {
        let mut parts = entry.split(';');
        let Some(target) = parts.next().map(str::trim) else {
            continue;
        };
        let Some(url) = target.strip_prefix('<').and_then(|t| t.strip_suffix('>')) else {
            continue;
        };

        for param in parts {
            let Some((key, rel)) = param.trim().split_once('=') else {
                continue;
            };
            if key.trim() != "rel" {
                continue;
            }
            // rel may hold several space-separated relation types
            for rel in rel.trim().trim_matches('"').split_whitespace() {
                match rel {
                    "next" => links.next = Some(url.to_string()),
                    "last" => links.last = Some(url.to_string()),
                    _ => {}
                }
            }
        }
    }

    links
}

/// The `page` query parameter of a `last` link.
pub fn last_page_number(url: &str) -> Option<u64> {
    let url = reqwest::Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
