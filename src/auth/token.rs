use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 10;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// HS256 signing and verification keys, built once from the configured secret.
///
/// Every token lives exactly `TOKEN_TTL_HOURS`.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a token for `user_id` that expires `TOKEN_TTL_HOURS` from now.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if it had been signed at `issued_at`.
    pub fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let expiration = issued_at
            .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
            .ok_or_else(|| AppError::internal("token expiry overflows"))?;

        let claims = Claims {
            sub: user_id,
            iat: issued_at.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies the signature and expiry of `token` and returns its claims.
    ///
    /// Malformed, tampered and expired tokens all come back as `AppError::Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> JwtKeys {
        JwtKeys::new(secret)
    }

    #[test]
    fn test_token_generation_and_verification() {
        let keys = keys("test_secret_for_gen_verify");
        let user_id = Uuid::new_v4();

        let token = keys.issue(user_id).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 10 * 60 * 60);
    }

    #[test]
    fn test_token_still_valid_after_nine_hours() {
        let keys = keys("test_secret_for_expiration");
        let issued_at = Utc::now() - Duration::hours(9);

        let token = keys.issue_at(Uuid::new_v4(), issued_at).unwrap();
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn test_token_expired_after_eleven_hours() {
        let keys = keys("test_secret_for_expiration");
        let issued_at = Utc::now() - Duration::hours(11);

        let token = keys.issue_at(Uuid::new_v4(), issued_at).unwrap();
        match keys.verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("ExpiredSignature")),
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = keys("signing_secret").issue(Uuid::new_v4()).unwrap();

        match keys("a_completely_different_secret").verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("InvalidSignature")),
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_malformed_token() {
        assert!(matches!(
            keys("secret").verify("not.a.jwt"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
