use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct JwtManager {
    secret: String,
    expiry_hours: i64,
    refresh_expiry_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(rename = "type")]
    pub token_type: String, // "access" or "refresh"
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        Uuid::parse_str(&self.sub).unwrap_or_default()
    }
}

impl JwtManager {
    pub fn new(secret: &str, expiry_hours: i64, refresh_expiry_hours: i64) -> Self {
        Self {
            secret: secret.to_string(),
            expiry_hours,
            refresh_expiry_hours,
        }
    }

    pub fn generate_access_token(&self, user_id: Uuid, email: &str) -> AppResult<String> {
        self.generate_token(user_id, email, "access", self.expiry_hours)
    }

    pub fn generate_refresh_token(&self, user_id: Uuid, email: &str) -> AppResult<String> {
        self.generate_token(user_id, email, "refresh", self.refresh_expiry_hours)
    }

    fn generate_token(
        &self,
        user_id: Uuid,
        email: &str,
        token_type: &str,
        expiry_hours: i64,
    ) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(expiry_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: token_type.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalError(format!("Failed to generate token: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;
        if claims.token_type != "access" {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }

    pub fn verify_refresh_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;
        if claims.token_type != "refresh" {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }

    pub fn get_expiry_hours(&self) -> i64 {
        self.expiry_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new("test-secret-that-is-long-enough", 24, 168)
    }

    #[test]
    fn access_token_round_trip() {
        let manager = manager();
        let user_id = Uuid::new_v4();
        let token = manager
            .generate_access_token(user_id, "parent@example.com")
            .unwrap();

        let claims = manager.verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.email, "parent@example.com");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn refresh_token_rejected_as_access() {
        let manager = manager();
        let token = manager
            .generate_refresh_token(Uuid::new_v4(), "parent@example.com")
            .unwrap();

        assert!(matches!(
            manager.verify_access_token(&token),
            Err(AppError::InvalidToken)
        ));
        assert!(manager.verify_refresh_token(&token).is_ok());
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(manager().verify_token("not.a.jwt").is_err());
    }
}
