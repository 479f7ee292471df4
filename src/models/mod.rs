// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod provider;
pub mod repository;
pub mod stats;
pub mod user;

pub use provider::{AccountKind, ProfileKey, Provider};
pub use repository::RepositoryRecord;
pub use stats::ProfileStats;
pub use user::LogicalUser;
