// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Normalized profile statistics and the cross-provider merge.
//!
//! `language_count` and `repo_topics_count` are not fields: they are
//! derived from the sets whenever a profile is serialized, so merged
//! profiles can never double-count a shared language or topic.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;

/// Statistics for one provider account, or the merge of several.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileStats {
    // ─── Sum Fields ──────────────────────────────────────────────
    #[serde(default)]
    pub public_source_repositories: u64,
    #[serde(default)]
    pub public_fork_repositories: u64,
    #[serde(default)]
    pub watcher_count: u64,
    #[serde(default)]
    pub follower_count: u64,
    #[serde(default)]
    pub total_open_issues: u64,
    #[serde(default)]
    pub total_source_commit_count: u64,
    #[serde(default)]
    pub total_account_size: u64,
    /// Zero for providers without stars.
    #[serde(default)]
    pub stars_received: u64,
    #[serde(default)]
    pub stars_given: u64,

    // ─── Union Fields ────────────────────────────────────────────
    /// Lowercase language names.
    #[serde(default)]
    pub languages: BTreeSet<String>,
    /// Empty for providers without topics.
    #[serde(default)]
    pub repo_topics: BTreeSet<String>,
}

impl ProfileStats {
    pub fn language_count(&self) -> usize {
        self.languages.len()
    }

    pub fn repo_topics_count(&self) -> usize {
        self.repo_topics.len()
    }

    /// Fold another profile into this one: sums add, sets union.
    pub fn merge_from(&mut self, other: &ProfileStats) {
        self.public_source_repositories = self
            .public_source_repositories
            .saturating_add(other.public_source_repositories);
        self.public_fork_repositories = self
            .public_fork_repositories
            .saturating_add(other.public_fork_repositories);
        self.watcher_count = self.watcher_count.saturating_add(other.watcher_count);
        self.follower_count = self.follower_count.saturating_add(other.follower_count);
        self.total_open_issues = self.total_open_issues.saturating_add(other.total_open_issues);
        self.total_source_commit_count = self
            .total_source_commit_count
            .saturating_add(other.total_source_commit_count);
        self.total_account_size = self
            .total_account_size
            .saturating_add(other.total_account_size);
        self.stars_received = self.stars_received.saturating_add(other.stars_received);
        self.stars_given = self.stars_given.saturating_add(other.stars_given);

        self.languages.extend(other.languages.iter().cloned());
        self.repo_topics.extend(other.repo_topics.iter().cloned());
    }

    /// Merge any number of profiles. An empty input yields the zero profile.
    pub fn merge<'a, I>(profiles: I) -> ProfileStats
    where
        I: IntoIterator<Item = &'a ProfileStats>,
    {
        profiles
            .into_iter()
            .fold(ProfileStats::default(), |mut acc, profile| {
                acc.merge_from(profile);
                acc
            })
    }
}

/// Wire shape: the stored fields plus the derived counts.
#[derive(Serialize)]
struct ProfileStatsBody<'a> {
    public_source_repositories: u64,
    public_fork_repositories: u64,
    watcher_count: u64,
    follower_count: u64,
    stars_received: u64,
    stars_given: u64,
    total_open_issues: u64,
    total_source_commit_count: u64,
    total_account_size: u64,
    languages: &'a BTreeSet<String>,
    language_count: usize,
    repo_topics: &'a BTreeSet<String>,
    repo_topics_count: usize,
}

impl Serialize for ProfileStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProfileStatsBody {
            public_source_repositories: self.public_source_repositories,
            public_fork_repositories: self.public_fork_repositories,
            watcher_count: self.watcher_count,
            follower_count: self.follower_count,
            stars_received: self.stars_received,
            stars_given: self.stars_given,
            total_open_issues: self.total_open_issues,
            total_source_commit_count: self.total_source_commit_count,
            total_account_size: self.total_account_size,
            languages: &self.languages,
            language_count: self.language_count(),
            repo_topics: &self.repo_topics,
            repo_topics_count: self.repo_topics_count(),
        }
        .serialize(serializer)
    }
}
