// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory user store.
//!
//! One lock guards both the users and the global ownership index, so the
//! "attached to at most one user" check and the insert are a single step.

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::{LogicalUser, ProfileKey};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Inner {
    users: HashMap<String, LogicalUser>,
    /// Which user each attached account belongs to.
    owners: HashMap<ProfileKey, String>,
}

/// Volatile process-memory store.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn user_not_found(username: &str) -> AppError {
    AppError::NotFound(format!("user {} not found", username))
}

fn already_attached(key: &ProfileKey, owner: &str) -> AppError {
    AppError::Conflict(format!(
        "{} profile {} already attached to {}",
        key.provider, key.handle, owner
    ))
}

impl UserStore for InMemoryUserStore {
    fn create_user(&self, username: &str) -> Result<(), AppError> {
        let mut inner = self.write();
        if inner.users.contains_key(username) {
            return Err(AppError::Conflict(format!(
                "user {} already exists",
                username
            )));
        }
        inner
            .users
            .insert(username.to_string(), LogicalUser::new(username));
        Ok(())
    }

    fn delete_user(&self, username: &str) -> Result<LogicalUser, AppError> {
        let mut inner = self.write();
        let user = inner
            .users
            .remove(username)
            .ok_or_else(|| user_not_found(username))?;

        // Release the accounts so they can be attached elsewhere
        for key in &user.attached {
            inner.owners.remove(key);
        }
        Ok(user)
    }

    fn get_user(&self, username: &str) -> Option<LogicalUser> {
        self.read().users.get(username).cloned()
    }

    fn owner_of(&self, key: &ProfileKey) -> Option<String> {
        self.read().owners.get(key).cloned()
    }

    fn attach(&self, username: &str, key: ProfileKey) -> Result<(), AppError> {
        let mut inner = self.write();
        if !inner.users.contains_key(username) {
            return Err(user_not_found(username));
        }
        if let Some(owner) = inner.owners.get(&key) {
            return Err(already_attached(&key, owner));
        }

        inner.owners.insert(key.clone(), username.to_string());
        if let Some(user) = inner.users.get_mut(username) {
            user.attached.insert(key);
        }
        Ok(())
    }

    fn detach(&self, username: &str, key: &ProfileKey) -> Result<(), AppError> {
        let mut inner = self.write();
        let user = inner
            .users
            .get_mut(username)
            .ok_or_else(|| user_not_found(username))?;

        if !user.attached.remove(key) {
            return Err(AppError::NotFound(format!(
                "{} not attached to user {}",
                key.handle, username
            )));
        }
        inner.owners.remove(key);
        Ok(())
    }
}
