use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, AppResult};

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::InternalError(format!("Hash error: {}", e)))
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    verify(password, hash).map_err(|e| AppError::InternalError(format!("Verify error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hashed = hash_password("correct horse battery").unwrap();
        assert_ne!(hashed, "correct horse battery");
        assert!(verify_password("correct horse battery", &hashed).unwrap());
        assert!(!verify_password("wrong password", &hashed).unwrap());
    }
}
