use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::{Config, TOKEN_ISSUER};
use crate::error::{Error, Result};

/// 时间来源，签发令牌时计算过期时间
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub uid: i64,
    pub iss: String,
    pub exp: i64, // 过期时间，Unix timestamp
}

/// 签发与校验 HS256 令牌。服务端不保存已签发的令牌，也不支持提前吊销。
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    session_validity: Duration,
    service_validity: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenAuthority {
    pub fn new(secret: &[u8], issuer: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: issuer.to_owned(),
            session_validity: Duration::from_secs(10 * 3600),
            service_validity: Duration::from_secs(20 * 365 * 24 * 3600),
            clock,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.as_bytes(), TOKEN_ISSUER, Arc::new(SystemClock))
            .with_validity(config.jwt_expiration(), config.service_token_expiration())
    }

    pub fn with_validity(mut self, session: Duration, service: Duration) -> Self {
        self.session_validity = session;
        self.service_validity = service;
        self
    }

    /// 登录时签发的短期令牌
    pub fn issue_session(&self, uid: i64) -> Result<String> {
        self.issue(uid, self.session_validity)
    }

    /// 服务间调用使用的长期令牌
    pub fn issue_service(&self, uid: i64) -> Result<String> {
        self.issue(uid, self.service_validity)
    }

    pub fn issue(&self, uid: i64, validity: Duration) -> Result<String> {
        let validity = chrono::Duration::from_std(validity)
            .map_err(|e| Error::Signing(format!("validity out of range: {e}")))?;
        let exp = self
            .clock
            .now()
            .checked_add_signed(validity)
            .ok_or_else(|| Error::Signing("expiry overflows".into()))?
            .timestamp();

        let claims = Claims {
            uid,
            iss: self.issuer.clone(),
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Signing(e.to_string()))
    }

    /// 校验签名和过期时间；签发者由调用方比对
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => Error::Expired,
                _ => Error::Malformed(e.to_string()),
            })
    }
}
