//! Domain DTOs for the user API.
//!
//! # Design
//! One `User` type serves as both the persisted record and the draft being
//! edited. `id` is `None` until the backend assigns one; it is left out of
//! the serialized JSON in that case so create requests never carry an id.
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// Backend-assigned identifier of a persisted user.
pub type UserId = i64;

/// A user record, either persisted (`id` set) or a draft (`id` unset).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
}

impl User {
    /// A new, not-yet-persisted record.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Copy of this record with the id stripped, as sent on create.
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }
}
