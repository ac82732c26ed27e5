use crate::error::AppError;
use actix_web::web;
use bcrypt::{hash, verify};

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
}

/// Constant-time comparison of `password` against a stored bcrypt hash.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::internal(format!("Failed to verify password: {}", e)))
}

/// `hash_password` on the blocking thread pool, off the actix worker.
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, AppError> {
    web::block(move || hash_password(&password, cost))
        .await
        .map_err(|e| AppError::internal(format!("password hashing task failed: {}", e)))?
}

/// `verify_password` on the blocking thread pool, off the actix worker.
pub async fn verify_password_blocking(
    password: String,
    hashed_password: String,
) -> Result<bool, AppError> {
    web::block(move || verify_password(&password, &hashed_password))
        .await
        .map_err(|e| AppError::internal(format!("password verification task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hash_password(password, TEST_COST).unwrap();

        assert_ne!(hashed, password);
        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("pw1", TEST_COST).unwrap();
        let second = hash_password("pw1", TEST_COST).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match verify_password("test_password123", "invalidhashformat") {
            Err(AppError::Internal { detail, .. }) => {
                assert!(detail.contains("Failed to verify password"));
            }
            Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    #[actix_rt::test]
    async fn test_blocking_variants() {
        let hashed = hash_password_blocking("pw1".into(), TEST_COST).await.unwrap();

        assert!(verify_password_blocking("pw1".into(), hashed.clone()).await.unwrap());
        assert!(!verify_password_blocking("pw2".into(), hashed).await.unwrap());
    }
}
