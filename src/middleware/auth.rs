use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::cache::UserCacheOperations;
use crate::config::{BEARER_PREFIX, TOKEN_ISSUER};
use crate::error::{Error, Result};
use crate::infrastructure::{Claims, TokenAuthority};

/// 访问控制：校验令牌并确认令牌中的用户存在
#[derive(Clone)]
pub struct AccessGate {
    tokens: TokenAuthority,
    users: UserCacheOperations,
    issuer: String,
}

impl AccessGate {
    pub fn new(tokens: TokenAuthority, users: UserCacheOperations) -> Self {
        Self {
            tokens,
            users,
            issuer: TOKEN_ISSUER.to_owned(),
        }
    }

    /// 校验 `Authorization` 头的值。
    ///
    /// `test_uid` 是集成测试用的后门：令牌里的 uid 等于它时不检查用户是否存在。
    /// 生产环境不要配置。
    pub async fn authorize(&self, token: Option<&str>, test_uid: Option<i64>) -> Result<Claims> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(Error::EmptyToken),
        };
        let raw = token
            .strip_prefix(BEARER_PREFIX)
            .ok_or(Error::Prefix(BEARER_PREFIX))?;

        let claims = self.tokens.verify(raw)?;
        if claims.iss != self.issuer {
            return Err(Error::IssuerMismatch(claims.iss));
        }

        if test_uid == Some(claims.uid) {
            tracing::debug!("test uid {} bypasses the existence check", claims.uid);
            return Ok(claims);
        }

        self.users.require_user(claims.uid).await?;
        Ok(claims)
    }
}

/// 受保护路由的中间件，校验通过后把 `Claims` 放进请求扩展
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> std::result::Result<Response, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let claims = state
        .gate
        .authorize(header.as_deref(), state.config.test_uid)
        .await
        .inspect_err(|e| tracing::warn!("{} check token err {}", req.uri().path(), e))?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
