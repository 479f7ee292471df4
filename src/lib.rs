// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Devstats: developer activity statistics across GitHub and Bitbucket
//!
//! This crate aggregates public repository statistics per provider account,
//! normalizes them into one profile shape, and merges the profiles of every
//! account attached to a logical user.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::ProfileRegistry;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub registry: ProfileRegistry,
}
