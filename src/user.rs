//! The `User` entity and the body accepted by create and update.

use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// A row of the `users` table. `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Request body for `POST /users` and `PUT /users/{id}`.
///
/// Both fields are required strings; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
}

/// Rejects a blank `name` or `email` before any statement is issued. A value
/// that is empty or only whitespace counts as blank.
pub(crate) fn validate(name: &str, email: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Validation("name must not be empty".to_owned()));
    }
    if email.trim().is_empty() {
        return Err(StoreError::Validation("email must not be empty".to_owned()));
    }
    Ok(())
}
