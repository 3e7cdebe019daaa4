use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::result::ApiResult;
use crate::utils::error_codes;

/// 核心层统一错误类型
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid format: {0}")]
    Format(String),

    #[error("password is wrong")]
    CredentialMismatch,

    #[error("token is empty")]
    EmptyToken,

    #[error("token prefix must be {0:?}")]
    Prefix(&'static str),

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token is expired")]
    Expired,

    #[error("issuer invalid: {0}")]
    IssuerMismatch(String),

    #[error("user {0} has no resolvable name")]
    UnknownUser(i64),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("{0} exceeded its deadline")]
    Cancelled(&'static str),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn code(&self) -> i32 {
        match self {
            Error::Validation(_) | Error::Format(_) => error_codes::VALIDATION_ERROR,
            Error::NotFound(_) => error_codes::NOT_FOUND,
            Error::UnknownUser(_) => error_codes::UNKNOWN_USER,
            Error::CredentialMismatch => error_codes::AUTH_FAILED,
            Error::EmptyToken
            | Error::Prefix(_)
            | Error::Malformed(_)
            | Error::Expired
            | Error::IssuerMismatch(_) => error_codes::TOKEN_INVALID,
            Error::StoreUnavailable(_) | Error::CacheUnavailable(_) | Error::Cancelled(_) => {
                error_codes::UNAVAILABLE
            }
            Error::Signing(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// 基础设施错误，调用方可以有限重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::StoreUnavailable(_) | Error::CacheUnavailable(_) | Error::Cancelled(_)
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::EmptyToken
            | Error::Prefix(_)
            | Error::Malformed(_)
            | Error::Expired
            | Error::IssuerMismatch(_) => StatusCode::UNAUTHORIZED,
            e if e.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
            Error::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("row not found".into()),
            // 外键、唯一、非空、检查约束冲突是调用方传错了参数
            sqlx::Error::Database(db) if !matches!(db.kind(), sqlx::error::ErrorKind::Other) => {
                Error::Validation(db.message().to_owned())
            }
            other => Error::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::CacheUnavailable(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ApiResult::<()>::error(self.code(), &self.to_string()));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlx_row_not_found_is_not_an_outage() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(!err.is_retryable());

        let err: Error = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, Error::StoreUnavailable(_)));
        assert!(err.is_retryable());
    }

    #[derive(Debug)]
    struct FakeDbError(sqlx::error::ErrorKind);

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("violates constraint")
        }
    }

    impl std::error::Error for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "violates constraint"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self.0 {
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    sqlx::error::ErrorKind::ForeignKeyViolation
                }
                _ => sqlx::error::ErrorKind::Other,
            }
        }
    }

    #[test]
    fn constraint_violation_is_a_caller_fault() {
        let fk = sqlx::Error::Database(Box::new(FakeDbError(
            sqlx::error::ErrorKind::ForeignKeyViolation,
        )));
        let err: Error = fk.into();
        assert!(matches!(err, Error::Validation(_)));
        assert!(!err.is_retryable());

        let other = sqlx::Error::Database(Box::new(FakeDbError(sqlx::error::ErrorKind::Other)));
        assert!(matches!(Error::from(other), Error::StoreUnavailable(_)));
    }

    #[test]
    fn token_failures_render_unauthorized() {
        let resp = Error::Expired.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = Error::CredentialMismatch.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
