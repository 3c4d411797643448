use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Password hashing failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(String),
}

/// A bcrypt hash in modular crypt format. Only constructible by hashing,
/// so a stored user can never carry a plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Hash password for secure storage with a salted bcrypt hash at a fixed cost.
pub fn hash_password(password: &str, cost: u32) -> Result<PasswordHash, HashError> {
    let hash = bcrypt::hash(password, cost)?;
    Ok(PasswordHash(hash))
}

/// Same as [`hash_password`], moved off the async workers since bcrypt is CPU bound.
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<PasswordHash, HashError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| HashError::Task(e.to_string()))?
}

/// Verify password against stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, HashError> {
    Ok(bcrypt::verify(password, hash)?)
}
