use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

/// 记录 5xx 与 401 响应的状态和响应体
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let response = next.run(req).await;

    let status = response.status();
    if !status.is_server_error() && status != StatusCode::UNAUTHORIZED {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, 4096).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to read error response body: {}", e);
            return Response::from_parts(parts, Body::empty());
        }
    };
    let body_str = String::from_utf8_lossy(&bytes);

    if status.is_server_error() {
        error!("{} failed - Status: {}, Body: {}", path, status, body_str);
    } else {
        warn!("{} rejected - Status: {}, Body: {}", path, status, body_str);
    }

    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}
