pub mod auth;
pub mod questionnaire;
pub mod results;

use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{AssessmentService, AuthService, QuestionnaireService};
use crate::utils::{ApiResponse, Claims};

/// Shared application state
pub struct AppState {
    pub auth_service: AuthService,
    pub questionnaire_service: QuestionnaireService,
    pub assessment_service: AssessmentService,
}

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(
        json!({
            "status": "healthy",
            "service": "screening-backend",
            "version": env!("CARGO_PKG_VERSION"),
        }),
        "Service is healthy",
    ))
}

/// Authenticated user id from the claims set by `AuthMiddleware`.
pub(crate) fn get_user_id(req: &HttpRequest) -> AppResult<Uuid> {
    req.extensions()
        .get::<Claims>()
        .map(|claims| claims.user_id())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
}

/// User id when present; anonymous requests yield `None`.
pub(crate) fn optional_user_id(req: &HttpRequest) -> Option<Uuid> {
    req.extensions().get::<Claims>().map(|claims| claims.user_id())
}

