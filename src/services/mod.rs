// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business logic services.

pub mod aggregate;
pub mod bitbucket;
pub mod builder;
pub mod github;
pub mod http;
pub mod pagination;
pub mod registry;

pub use bitbucket::BitbucketClient;
pub use builder::{ProfileBuilder, ProfileFetcher};
pub use github::GithubClient;
pub use registry::ProfileRegistry;
