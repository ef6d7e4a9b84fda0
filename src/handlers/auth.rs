use actix_web::{web, HttpRequest, HttpResponse};

use crate::error::AppResult;
use crate::models::{LoginRequest, RefreshTokenRequest, RegisterRequest, UpdateProfileRequest};
use crate::utils::{validate_request, ApiResponse};

use super::{get_user_id, AppState};

pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let response = state.auth_service.register(request).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(response, "Registration successful")))
}

pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let response = state.auth_service.login(request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
}

pub async fn refresh_token(
    state: web::Data<AppState>,
    payload: web::Json<RefreshTokenRequest>,
) -> AppResult<HttpResponse> {
    let response = state
        .auth_service
        .refresh(&payload.refresh_token)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Token refreshed")))
}

pub async fn get_profile(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let user = state.auth_service.get_profile(user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "Profile retrieved")))
}

pub async fn update_profile(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let user = state
        .auth_service
        .update_profile(user_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "Profile updated")))
}
