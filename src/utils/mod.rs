use std::future::Future;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};

use crate::error::{Error, Result};

/// 生日、注册时间、好友建立时间统一使用的格式
pub const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now_naive() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn parse_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIME_LAYOUT)
        .map_err(|e| Error::Format(format!("{value:?} does not match {TIME_LAYOUT}: {e}")))
}

/// 给存储/缓存调用加上截止时间，超时按 `Error::Cancelled` 返回
pub async fn with_deadline<T, F>(timeout: Duration, op: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_) => {
            tracing::warn!("{} timed out after {:?}", op, timeout);
            Err(Error::Cancelled(op))
        }
    }
}

/// serde 辅助：按 `TIME_LAYOUT` 读写 `NaiveDateTime`
pub mod time_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::TIME_LAYOUT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(TIME_LAYOUT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIME_LAYOUT).map_err(de::Error::custom)
    }
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const AUTH_FAILED: i32 = 1002;
    pub const NOT_FOUND: i32 = 1004;
    pub const TOKEN_INVALID: i32 = 1006;
    pub const UNKNOWN_USER: i32 = 1007;
    pub const UNAVAILABLE: i32 = 5003;
    pub const INTERNAL_ERROR: i32 = 5000;
}
