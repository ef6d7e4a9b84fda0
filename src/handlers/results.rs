use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::error::AppResult;
use crate::utils::ApiResponse;

use super::{get_user_id, AppState};

pub async fn list_results(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let results = state.assessment_service.list_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(results, "Results retrieved")))
}

pub async fn get_result(
    state: web::Data<AppState>,
    req: HttpRequest,
    result_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let result = state
        .assessment_service
        .get_for_user(result_id.into_inner(), user_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result, "Result retrieved")))
}
