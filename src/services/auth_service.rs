//! Authentication service.
//!
//! Credential checks and signup with bcrypt password hashing. No session
//! or token issuance: a successful login returns a minimal user
//! descriptor and the client retains state itself.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, Result};
use crate::models::user::{NewUser, Role, UserDescriptor};
use crate::store::MemStore;

/// Authentication service
pub struct AuthService {
    store: Arc<MemStore>,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    /// Authenticate with username and password.
    ///
    /// Username matching is case-sensitive and exact; any mismatch yields
    /// the same error so the response does not reveal which part failed.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserDescriptor> {
        let user = self
            .store
            .get_user_by_username(username)
            .await
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        Ok(UserDescriptor::from(&user))
    }

    /// Create a new account with a hashed password.
    pub async fn signup(&self, username: &str, password: &str, role: Role) -> Result<UserDescriptor> {
        let password_hash = Self::hash_password(password)?;
        let user = self
            .store
            .create_user(NewUser {
                username: username.to_string(),
                password_hash,
                role,
            })
            .await
            .ok_or_else(|| {
                AppError::Conflict(format!("Username '{}' is already taken", username))
            })?;

        Ok(UserDescriptor::from(&user))
    }

    /// Hash a password
    pub fn hash_password(password: &str) -> Result<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
        verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
    }
}
