use validator::Validate;

use crate::error::{AppError, AppResult};

/// Validate a request struct using the validator crate
pub fn validate_request<T: Validate>(request: &T) -> AppResult<()> {
    request.validate().map_err(|e| {
        let errors: Vec<String> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| {
                    format!(
                        "{}: {}",
                        field,
                        err.message.clone().unwrap_or_else(|| "Invalid value".into())
                    )
                })
            })
            .collect();

        AppError::ValidationError(errors.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegisterRequest;

    #[test]
    fn register_request_rejects_bad_email() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
            name: None,
        };
        assert!(matches!(
            validate_request(&req),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn register_request_rejects_short_password() {
        let req = RegisterRequest {
            email: "parent@example.com".to_string(),
            password: "short".to_string(),
            name: Some("A Parent".to_string()),
        };
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn register_request_accepts_valid_input() {
        let req = RegisterRequest {
            email: "parent@example.com".to_string(),
            password: "longenough".to_string(),
            name: None,
        };
        assert!(validate_request(&req).is_ok());
    }
}
