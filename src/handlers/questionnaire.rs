use actix_web::{web, HttpRequest, HttpResponse};

use crate::error::AppResult;
use crate::models::SubmitAssessmentRequest;
use crate::utils::ApiResponse;

use super::{optional_user_id, AppState};

pub async fn list_questionnaires(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let questionnaires = state.questionnaire_service.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        questionnaires,
        "Questionnaires retrieved",
    )))
}

pub async fn get_questionnaire(
    state: web::Data<AppState>,
    identifier: web::Path<String>,
) -> AppResult<HttpResponse> {
    let questionnaire = state.questionnaire_service.get(&identifier).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        questionnaire,
        "Questionnaire retrieved",
    )))
}

/// Anonymous submissions are accepted; when a valid token is present the
/// result is linked to the caller.
pub async fn submit_assessment(
    state: web::Data<AppState>,
    req: HttpRequest,
    identifier: web::Path<String>,
    payload: web::Json<SubmitAssessmentRequest>,
) -> AppResult<HttpResponse> {
    let user_id = optional_user_id(&req);
    let result = state
        .assessment_service
        .submit(user_id, &identifier, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(result, "Assessment scored")))
}
