// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Repository-list reduction and per-provider profile assembly.
//!
//! Everything here is pure: no I/O, same input gives the same output.
//!
//! Fork rules:
//! - size, languages, topics, stars and watchers include forks
//! - open issues and commits exclude forks

use crate::models::{ProfileStats, RepositoryRecord};
use std::collections::BTreeSet;

/// Totals derivable from a repository list alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySummary {
    pub sources: u64,
    pub forks: u64,
    pub total_size: u64,
    pub stars_received: u64,
    pub watchers: u64,
    /// Non-fork repositories only.
    pub open_issues: u64,
    pub languages: BTreeSet<String>,
    pub topics: BTreeSet<String>,
}

/// Reduce a repository list to its summary.
pub fn summarize(repos: &[RepositoryRecord]) -> RepositorySummary {
    let mut summary = RepositorySummary::default();

    for repo in repos {
        if repo.is_fork {
            summary.forks += 1;
        } else {
            summary.sources += 1;
            summary.open_issues = summary.open_issues.saturating_add(repo.open_issue_count);
        }

        summary.total_size = summary.total_size.saturating_add(repo.size);
        summary.stars_received = summary.stars_received.saturating_add(repo.star_count);
        summary.watchers = summary.watchers.saturating_add(repo.watcher_count);

        if let Some(language) = &repo.language {
            summary.languages.insert(language.clone());
        }
        summary.topics.extend(repo.topics.iter().cloned());
    }

    summary
}

/// Repositories whose commits count toward the source commit total.
pub fn commit_eligible(repos: &[RepositoryRecord]) -> impl Iterator<Item = &RepositoryRecord> {
    repos.iter().filter(|repo| !repo.is_fork)
}

/// Repositories whose issue trackers count toward open issues.
pub fn issue_eligible(repos: &[RepositoryRecord]) -> impl Iterator<Item = &RepositoryRecord> {
    repos.iter().filter(|repo| repo.has_issues && !repo.is_fork)
}

/// Account-level GitHub counts fetched outside the repository list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GithubCounts {
    pub followers: u64,
    pub starred: u64,
    pub commits: u64,
}

/// Bitbucket counts fetched outside the repository list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitbucketCounts {
    pub followers: u64,
    pub commits: u64,
    pub open_issues: u64,
    pub watchers: u64,
}

impl RepositorySummary {
    /// GitHub reports watchers, stars and open issues on the list itself.
    pub fn into_github_profile(self, counts: GithubCounts) -> ProfileStats {
        ProfileStats {
            public_source_repositories: self.sources,
            public_fork_repositories: self.forks,
            watcher_count: self.watchers,
            follower_count: counts.followers,
            total_open_issues: self.open_issues,
            total_source_commit_count: counts.commits,
            total_account_size: self.total_size,
            stars_received: self.stars_received,
            stars_given: counts.starred,
            languages: self.languages,
            repo_topics: self.topics,
        }
    }

    /// Bitbucket has no stars or topics; watchers and issues come per repository.
    pub fn into_bitbucket_profile(self, counts: BitbucketCounts) -> ProfileStats {
        ProfileStats {
            public_source_repositories: self.sources,
            public_fork_repositories: self.forks,
            watcher_count: counts.watchers,
            follower_count: counts.followers,
            total_open_issues: counts.open_issues,
            total_source_commit_count: counts.commits,
            total_account_size: self.total_size,
            stars_received: 0,
            stars_given: 0,
            languages: self.languages,
            repo_topics: BTreeSet::new(),
        }
    }
}
