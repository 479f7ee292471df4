// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider identity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source-control hosting provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Github,
    Bitbucket,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Github => "github",
            Provider::Bitbucket => "bitbucket",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Provider::Github),
            "bitbucket" => Ok(Provider::Bitbucket),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// A provider account: the unit of caching and of attachment uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileKey {
    pub provider: Provider,
    pub handle: String,
}

impl ProfileKey {
    pub fn new(provider: Provider, handle: impl Into<String>) -> Self {
        Self {
            provider,
            handle: handle.into(),
        }
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.handle)
    }
}

/// Whether an account is a person or a team/organization.
///
/// Providers that distinguish the two expose followers under different
/// endpoints, so the kind is resolved once before the follower lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Individual,
    Group,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trips_through_path_form() {
        for provider in [Provider::Github, Provider::Bitbucket] {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_provider_rejects_unknown_and_mixed_case() {
        assert!("gitlab".parse::<Provider>().is_err());
        assert!("GitHub".parse::<Provider>().is_err());
    }

    #[test]
    fn test_profile_key_display() {
        let key = ProfileKey::new(Provider::Bitbucket, "acme");
        assert_eq!(key.to_string(), "bitbucket/acme");
    }
}
