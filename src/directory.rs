//! Identity Directory: read-only lookups of user records.
//!
//! The directory is consumed, not owned, by the enrollment core. Account
//! creation, credential handling, and profile editing live elsewhere; the
//! core only needs to answer "who is this id" and "which users are mentors".

use serde::{Deserialize, Serialize};

use crate::mentorship::domain::UserId;
use crate::storage::StorageError;

/// Role tag fixed at registration time; a user never changes role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Student,
    Mentor,
}

/// Identity record as the directory exposes it to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: AccountRole,
}

impl User {
    pub fn is_mentor(&self) -> bool {
        self.role == AccountRole::Mentor
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Lightweight projection used wherever a full identity record would leak
/// more than a caller should see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Read-only identity lookups consumed by the enrollment core.
pub trait IdentityDirectory: Send + Sync {
    fn find_user(&self, id: &UserId) -> Result<Option<User>, StorageError>;

    /// Mentor-role users in creation order. The ordering is a contract: the
    /// mentor resolver's fallback assigns the first entry.
    fn mentors(&self) -> Result<Vec<User>, StorageError>;
}

/// Directory backed by an in-memory user list, kept in creation order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    users: Vec<User>,
}

impl InMemoryDirectory {
    pub fn from_users(users: Vec<User>) -> Self {
        Self { users }
    }
}

impl IdentityDirectory for InMemoryDirectory {
    fn find_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        Ok(self.users.iter().find(|user| &user.id == id).cloned())
    }

    fn mentors(&self) -> Result<Vec<User>, StorageError> {
        Ok(self
            .users
            .iter()
            .filter(|user| user.is_mentor())
            .cloned()
            .collect())
    }
}
