//! Storage layer: logical users and cached provider profiles.

pub mod cache;
pub mod memory;

pub use cache::ProfileCache;
pub use memory::InMemoryUserStore;

use crate::error::AppError;
use crate::models::{LogicalUser, ProfileKey};

/// Repository of logical users and their attached provider accounts.
///
/// Implementations must make `attach` atomic with its uniqueness check:
/// an account may belong to at most one user across the whole store.
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` if the username exists.
    fn create_user(&self, username: &str) -> Result<(), AppError>;

    /// Remove a user and release every account attached to it.
    fn delete_user(&self, username: &str) -> Result<LogicalUser, AppError>;

    fn get_user(&self, username: &str) -> Option<LogicalUser>;

    /// The user an account is attached to, if any.
    fn owner_of(&self, key: &ProfileKey) -> Option<String>;

    /// Fails with `NotFound` for an unknown user, `Conflict` if the account
    /// is attached anywhere (including to this user).
    fn attach(&self, username: &str, key: ProfileKey) -> Result<(), AppError>;

    /// Fails with `NotFound` if the user is unknown or the account is not
    /// attached to that user.
    fn detach(&self, username: &str, key: &ProfileKey) -> Result<(), AppError>;
}
