use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use portal_api::{Claims, TokenPair, User};

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

pub struct JwtService {
    secret: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_ttl_seconds: i64, refresh_ttl_seconds: i64) -> Self {
        JwtService {
            secret: secret.into(),
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    /// Mints a token for `user` with the given lifetime. Negative TTLs
    /// are allowed on purpose: tests mint already-expired access tokens
    /// to exercise the client's refresh path.
    pub fn generate_with_ttl(&self, user: &User, ttl_seconds: i64) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            verified: user.verified,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::Encode)
    }

    /// Access + refresh pair with the configured lifetimes.
    pub fn generate_pair(&self, user: &User) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.generate_with_ttl(user, self.access_ttl_seconds)?,
            refresh_token: self.generate_with_ttl(user, self.refresh_ttl_seconds)?,
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portal_api::Role;

    fn demo_user() -> User {
        User {
            id: 7,
            email: "reporter@example.com".to_string(),
            name: "Reporter".to_string(),
            role: Role::Reporter,
            verified: true,
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn round_trip_preserves_claims() {
        let jwt = JwtService::new("portal-mock-secret-for-local-testing-only", 900, 3600);
        let token = jwt.generate_with_ttl(&demo_user(), 900).expect("mint token");
        let claims = jwt.verify_token(&token).expect("verify token");

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.role, Role::Reporter);
        assert!(claims.verified);
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = JwtService::new("portal-mock-secret-for-local-testing-only", 900, 3600);
        let token = jwt
            .generate_with_ttl(&demo_user(), -60)
            .expect("mint expired token");
        assert!(jwt.verify_token(&token).is_err());
    }
}
