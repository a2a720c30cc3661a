//! User Records
//!
//! TigerStyle: In-memory, ordered user directory.
//!
//! Users live for the lifetime of the process only. The store is a plain
//! ordered sequence:
//! - Insertion order is the display order
//! - New ids are the last record's id + 1 (or 1 when empty)
//! - Deleting an absent id is a no-op

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Id given to the first user of an empty store
pub const USER_ID_FIRST: i64 = 1;

/// Name of the user present at process start
pub const SEED_USER_NAME: &str = "Артём";

/// Date format used when users are serialized
pub const USER_DOB_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Types
// =============================================================================

/// A directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique, immutable id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Date of birth
    pub dob: NaiveDate,
}

impl User {
    /// Create a user with an already-assigned id
    pub fn new(id: i64, name: impl Into<String>, dob: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            dob,
        }
    }

    /// The user every fresh process starts with
    pub fn seed() -> Self {
        // 1990-01-01 is always a valid calendar date
        let dob = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or(NaiveDate::MIN);
        Self::new(USER_ID_FIRST, SEED_USER_NAME, dob)
    }
}

// =============================================================================
// User Store
// =============================================================================

/// Ordered in-memory user store
#[derive(Debug, Default)]
pub struct UserStore {
    users: Vec<User>,
}

impl UserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding only the seed user
    pub fn with_seed() -> Self {
        Self {
            users: vec![User::seed()],
        }
    }

    /// All users in insertion order
    pub fn list(&self) -> &[User] {
        &self.users
    }

    /// Look up a user by id
    pub fn get(&self, id: i64) -> Result<&User, UserError> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .ok_or(UserError::NotFound(id))
    }

    /// Append a new user and return it.
    ///
    /// The id is derived from the last record, not from every record. Ids
    /// are appended in increasing order so the last one is also the largest,
    /// but an id freed by deleting the trailing user is handed out again.
    pub fn add(&mut self, name: impl Into<String>, dob: NaiveDate) -> User {
        let id = self.users.last().map_or(USER_ID_FIRST, |u| u.id + 1);
        let user = User::new(id, name, dob);
        self.users.push(user.clone());
        user
    }

    /// Remove every user with this id, returning how many were removed
    pub fn delete(&mut self, id: i64) -> usize {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        before - self.users.len()
    }

    /// Number of users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store holds no users
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Thread-safe user store
pub type SharedUserStore = Arc<RwLock<UserStore>>;

/// Create a new shared store holding only the seed user
pub fn new_shared_store() -> SharedUserStore {
    Arc::new(RwLock::new(UserStore::with_seed()))
}

// =============================================================================
// Errors
// =============================================================================

/// User-related errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("user not found: {0}")]
    NotFound(i64),
}

// =============================================================================
// Tests
// =============================================================================
