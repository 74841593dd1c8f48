//! bcrypt password hashing for staff accounts.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("secret-password").unwrap();
        assert_ne!(hashed, "secret-password");
        assert!(verify_password("secret-password", &hashed).unwrap());
        assert!(!verify_password("wrong-password", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_malformed_hash_is_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}
