// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider-agnostic repository record.

use std::collections::BTreeSet;

/// One repository, normalized from a provider's list endpoint.
///
/// Counts a provider does not report on its repository list are zero here;
/// the provider's own supplementary fetches supply them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryRecord {
    /// Repository slug/name used to address sub-resources.
    pub handle: String,
    pub is_fork: bool,
    /// Lowercased; `None` when the provider reports no language.
    pub language: Option<String>,
    /// Provider-defined unit, summed verbatim.
    pub size: u64,
    pub has_issues: bool,
    pub open_issue_count: u64,
    pub star_count: u64,
    pub watcher_count: u64,
    pub topics: BTreeSet<String>,
}

/// Lowercase a raw language value, dropping blank ones.
pub fn normalize_language(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language(Some("JavaScript")), Some("javascript".to_string()));
        assert_eq!(normalize_language(Some("")), None);
        assert_eq!(normalize_language(Some("   ")), None);
        assert_eq!(normalize_language(None), None);
    }
}
