//! Credential checks for the admin endpoints.
//!
//! Passwords are only ever compared against an Argon2id PHC hash supplied through
//! configuration. With no configured credentials every login is rejected.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::warn;

use super::config::AdminCredentials;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid password hash: {0}")]
    InvalidHash(String),
    #[error("failed to hash password: {0}")]
    Hashing(String),
}

pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;

    /// Whether any login can succeed at all
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Rejects every login
pub struct DisabledCredentials;

impl CredentialVerifier for DisabledCredentials {
    fn verify(&self, _username: &str, _password: &str) -> bool {
        false
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// A single admin account checked against an Argon2 hash
pub struct Argon2Credentials {
    username: String,
    password_hash: String,
}

impl Argon2Credentials {
    pub fn new(username: String, password_hash: String) -> Result<Self, AuthError> {
        PasswordHash::new(&password_hash).map_err(|e| AuthError::InvalidHash(e.to_string()))?;
        Ok(Self {
            username,
            password_hash,
        })
    }
}

impl CredentialVerifier for Argon2Credentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!(error = %e, "Stored admin password hash is unreadable");
                false
            }
        }
    }
}

/// Pick the verifier for the configured admin account, if any
pub fn verifier_from_config(admin: Option<&AdminCredentials>) -> Result<Box<dyn CredentialVerifier>, AuthError> {
    match admin {
        Some(admin) => Ok(Box::new(Argon2Credentials::new(
            admin.username.clone(),
            admin.password_hash.clone(),
        )?)),
        None => {
            warn!("No admin credentials configured; admin endpoints are disabled");
            Ok(Box::new(DisabledCredentials))
        }
    }
}

/// Produce a PHC hash suitable for `KEEVIQO_ADMIN_PASSWORD_HASH`
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argon2_credentials() {
        let hash = hash_password("correct-horse-battery-staple").unwrap();
        assert!(hash.starts_with("$argon2"));

        let verifier = Argon2Credentials::new("admin".to_string(), hash).unwrap();
        assert!(verifier.is_enabled());
        assert!(verifier.verify("admin", "correct-horse-battery-staple"));
        assert!(!verifier.verify("admin", "wrong-password"));
        assert!(!verifier.verify("someone-else", "correct-horse-battery-staple"));
    }

    #[test]
    fn test_invalid_hash_is_rejected_up_front() {
        let result = Argon2Credentials::new("admin".to_string(), "plaintext".to_string());
        assert!(matches!(result, Err(AuthError::InvalidHash(_))));
    }

    #[test]
    fn test_disabled_when_not_configured() {
        let verifier = verifier_from_config(None).unwrap();
        assert!(!verifier.is_enabled());
        assert!(!verifier.verify("admin", "admin"));
    }
}
