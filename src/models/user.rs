//! Logical user model.

use crate::models::ProfileKey;
use serde::Serialize;
use std::collections::BTreeSet;

/// The system's own identity grouping provider accounts under one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalUser {
    /// Unique key
    pub username: String,
    /// Attached provider accounts
    pub attached: BTreeSet<ProfileKey>,
}

impl LogicalUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            attached: BTreeSet::new(),
        }
    }
}
