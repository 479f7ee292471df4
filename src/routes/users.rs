// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Logical user routes.

use crate::error::{AppError, Result};
use crate::models::{ProfileKey, ProfileStats, Provider};
use crate::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// User routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/user/{username}",
            post(create_user).get(get_user).delete(delete_user),
        )
        .route(
            "/user/{username}/{provider}/{handle}",
            post(attach_profile).delete(detach_profile),
        )
}

/// Body of every CRUD response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Deserialize, Validate)]
struct UserPath {
    #[validate(length(min = 1, max = 100))]
    username: String,
}

#[derive(Deserialize, Validate)]
struct ProfilePath {
    #[validate(length(min = 1, max = 100))]
    username: String,
    provider: String,
    #[validate(length(min = 1, max = 100))]
    handle: String,
}

impl ProfilePath {
    fn key(&self) -> Result<ProfileKey> {
        let provider = self
            .provider
            .parse::<Provider>()
            .map_err(|e| AppError::NotFound(e.to_string()))?;
        Ok(ProfileKey::new(provider, self.handle.clone()))
    }
}

/// Path extraction whose rejection is reported as an `AppError`.
type PathParams<T> = std::result::Result<Path<T>, PathRejection>;

fn validated<T: Validate>(params: PathParams<T>) -> Result<T> {
    let Path(params) = params?;
    params
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(params)
}

// ─── Users ───────────────────────────────────────────────────

async fn create_user(
    State(state): State<Arc<AppState>>,
    params: PathParams<UserPath>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let UserPath { username } = validated(params)?;
    state.registry.create_user(&username)?;
    Ok((
        StatusCode::CREATED,
        MessageResponse::new(format!("user {} created", username)),
    ))
}

/// Merged statistics of every account attached to the user.
async fn get_user(
    State(state): State<Arc<AppState>>,
    params: PathParams<UserPath>,
) -> Result<Json<ProfileStats>> {
    let UserPath { username } = validated(params)?;
    let merged = state.registry.merged_profile(&username).await?;
    Ok(Json(merged))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    params: PathParams<UserPath>,
) -> Result<Json<MessageResponse>> {
    let UserPath { username } = validated(params)?;
    state.registry.delete_user(&username)?;
    Ok(MessageResponse::new(format!(
        "user {} deleted successfully",
        username
    )))
}

// ─── Provider Accounts ───────────────────────────────────────

async fn attach_profile(
    State(state): State<Arc<AppState>>,
    params: PathParams<ProfilePath>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let params = validated(params)?;
    let key = params.key()?;
    state.registry.attach(&params.username, key.clone()).await?;
    Ok((
        StatusCode::CREATED,
        MessageResponse::new(format!(
            "added {} profile {} to {}",
            key.provider, key.handle, params.username
        )),
    ))
}

async fn detach_profile(
    State(state): State<Arc<AppState>>,
    params: PathParams<ProfilePath>,
) -> Result<Json<MessageResponse>> {
    let params = validated(params)?;
    let key = params.key()?;
    state.registry.detach(&params.username, &key)?;
    Ok(MessageResponse::new(format!(
        "removed {} from user {}",
        key.handle, params.username
    )))
}
