use axum::{
    extract::{Json, Query, State},
    response::Json as JsonResponse,
};

use crate::{
    AppState,
    database::{Friend, FriendEdge},
    error::Result,
    result::ApiResult,
};

use super::model::{AddFriendRequest, FriendsQuery};

type ApiResponse<T> = Result<JsonResponse<ApiResult<T>>>;

#[axum::debug_handler]
pub async fn add_friend(
    State(state): State<AppState>,
    Json(req): Json<AddFriendRequest>,
) -> ApiResponse<Friend> {
    let friend = state.friends.add_friend(req.into()).await?;
    Ok(JsonResponse(ApiResult::success(friend)))
}

/// 修改备注，body 为 `{id, uid, fid, new_nick}`，`id` 与 `(uid, fid)` 至少给一个
#[axum::debug_handler]
pub async fn update_nick(
    State(state): State<AppState>,
    Json(edge): Json<FriendEdge>,
) -> ApiResponse<()> {
    state.friends.rename_friend(&edge).await?;
    Ok(JsonResponse(ApiResult::ok()))
}

#[axum::debug_handler]
pub async fn delete_friend(
    State(state): State<AppState>,
    Json(edge): Json<FriendEdge>,
) -> ApiResponse<()> {
    state.friends.remove_friend(&edge).await?;
    Ok(JsonResponse(ApiResult::ok()))
}

#[axum::debug_handler]
pub async fn list_friends(
    State(state): State<AppState>,
    Query(query): Query<FriendsQuery>,
) -> ApiResponse<Vec<Friend>> {
    let friends = state.friends.list_friends(query.uid).await?;
    Ok(JsonResponse(ApiResult::success(friends)))
}
