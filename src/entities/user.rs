//! User entity - Ephemeral session identity, never persisted.

use serde::{Deserialize, Serialize};

/// Signed-in traveler or agency operator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name
    pub name: String,
    /// Email address, also used to recognise the agency account
    pub email: String,
    /// Avatar image URI
    pub avatar: String,
}
