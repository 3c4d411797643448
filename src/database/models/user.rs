use bson::{doc, Document};
use serde::{Deserialize, Serialize};

use crate::auth::PasswordHash;

pub const COLLECTION: &str = "users";

/// Body of POST /users. Missing fields decode as empty strings.
#[derive(Clone, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Stored user document. The password field only ever holds a hash.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl User {
    pub fn new(new_user: NewUser, password_hash: PasswordHash) -> Self {
        Self {
            name: new_user.name,
            email: new_user.email,
            password: password_hash.into_string(),
        }
    }

    /// Fields never returned to clients.
    pub fn public_projection() -> Document {
        doc! { "password": 0 }
    }
}
