//! User entity - the slice of a user record the group core reads
//!
//! Users are owned by the account subsystem; group logic only checks that
//! they exist and never mutates them.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Whether the profile is publicly visible
    pub is_public: bool,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>, is_public: bool) -> Self {
        Self {
            id,
            username: username.into(),
            is_public,
        }
    }
}
