mod hash;
mod jwt;
pub mod response;
mod validator;

pub use hash::*;
pub use jwt::*;
pub use response::*;
pub use validator::*;

/// Verify JWT token helper function used by middleware
pub fn verify_token(token: &str, secret: &str) -> crate::error::AppResult<Claims> {
    use jsonwebtoken::{decode, DecodingKey, Validation};
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    if token_data.claims.token_type != "access" {
        return Err(crate::error::AppError::InvalidToken);
    }
    Ok(token_data.claims)
}
