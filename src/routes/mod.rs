pub mod friend;
pub mod user;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;
use crate::middleware::{auth_middleware, log_errors};

/// 组装 `/v1` 下的全部路由，公开路由只有注册和登录
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/user/register", post(user::register))
        .route("/user/login", post(user::login));

    let protected_routes = Router::new()
        // 用户
        .route("/user/update/pwd", post(user::update_password))
        .route("/user/update/nick", post(user::update_nick))
        .route("/user/update/sign", post(user::update_sign))
        .route("/user/update/birthday", post(user::update_birthday))
        .route("/user/exists/{id}", get(user::exists))
        // 好友
        .route("/friend/add", post(friend::add_friend))
        .route("/friend/update/nick", post(friend::update_nick))
        .route("/friend/delete", post(friend::delete_friend))
        .route("/friend/query/friends", get(friend::list_friends))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/v1", Router::new().merge(public_routes).merge(protected_routes))
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
