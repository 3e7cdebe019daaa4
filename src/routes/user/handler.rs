use axum::{
    extract::{Json, Path, State},
    response::Json as JsonResponse,
};

use crate::{AppState, database::NewUser, error::Result, result::ApiResult};

use super::model::{
    ExistsResponse, LoginRequest, LoginResponse, RegisterResponse, UpdateBirthdayRequest,
    UpdateNickRequest, UpdatePasswordRequest, UpdateSignRequest,
};

type ApiResponse<T> = Result<JsonResponse<ApiResult<T>>>;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> ApiResponse<RegisterResponse> {
    let id = state.users.register(req).await?;
    tracing::info!("user {} registered", id);
    Ok(JsonResponse(ApiResult::success(RegisterResponse { id })))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResponse<LoginResponse> {
    req.check()?;
    let user = state.users.login_and_fetch(req.id, &req.pwd).await?;
    let token = state.tokens.issue_session(user.id)?;
    Ok(JsonResponse(ApiResult::success(LoginResponse::new(user, token))))
}

#[axum::debug_handler]
pub async fn update_password(
    State(state): State<AppState>,
    Json(req): Json<UpdatePasswordRequest>,
) -> ApiResponse<()> {
    state.users.update_password(req.id, &req.new_pwd).await?;
    Ok(JsonResponse(ApiResult::ok()))
}

#[axum::debug_handler]
pub async fn update_nick(
    State(state): State<AppState>,
    Json(req): Json<UpdateNickRequest>,
) -> ApiResponse<()> {
    state.users.update_nick(req.id, &req.new_nick).await?;
    Ok(JsonResponse(ApiResult::ok()))
}

#[axum::debug_handler]
pub async fn update_sign(
    State(state): State<AppState>,
    Json(req): Json<UpdateSignRequest>,
) -> ApiResponse<()> {
    state.users.update_sign(req.id, &req.new_sign).await?;
    Ok(JsonResponse(ApiResult::ok()))
}

#[axum::debug_handler]
pub async fn update_birthday(
    State(state): State<AppState>,
    Json(req): Json<UpdateBirthdayRequest>,
) -> ApiResponse<()> {
    state
        .users
        .update_birthday(req.id, &req.new_birthday)
        .await?;
    Ok(JsonResponse(ApiResult::ok()))
}

#[axum::debug_handler]
pub async fn exists(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResponse<ExistsResponse> {
    let exists = state.users.user_exists(id).await?;
    Ok(JsonResponse(ApiResult::success(ExistsResponse { id, exists })))
}
