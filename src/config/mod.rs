use std::env;
use std::time::Duration;

/// 令牌签发者
pub const TOKEN_ISSUER: &str = "lq-chat";

/// `Authorization` 头中令牌前缀
pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub service_token_expiration_secs: u64,
    pub cache_ttl_secs: u64,
    pub operation_timeout_ms: u64,
    pub db_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    /// 集成测试后门：令牌中的 uid 等于该值时跳过用户存在性检查。未设置即关闭。
    pub test_uid: Option<i64>,
}

/// 关系库连接配置，`fingerprint` 作为连接池注册表的键
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub fn fingerprint(&self) -> String {
        format!("{}-{}", self.url, self.max_connections)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub url: String,
}

impl RedisConfig {
    pub fn fingerprint(&self) -> String {
        self.url.clone()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.trim_end_matches('h').parse::<u64>().ok())
            .unwrap_or(10);
        let service_expiration = env::var("SERVICE_TOKEN_EXPIRATION")
            .ok()
            .and_then(|v| v.trim_end_matches('d').parse::<u64>().ok())
            .unwrap_or(20 * 365);
        let test_uid = match env::var("TEST_UID") {
            Ok(v) => v.parse::<i64>().ok(),
            Err(_) => None,
        };

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_expiration_secs: jwt_expiration * 3600,
            service_token_expiration_secs: service_expiration * 24 * 3600,
            cache_ttl_secs: parse_or("CACHE_TTL", 5),
            operation_timeout_ms: parse_or("OPERATION_TIMEOUT_MS", 3000),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            server_port: parse_or("SERVER_PORT", 8080),
            test_uid,
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    pub fn service_token_expiration(&self) -> Duration {
        Duration::from_secs(self.service_token_expiration_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    pub fn db(&self) -> DbConfig {
        DbConfig {
            url: self.database_url.clone(),
            max_connections: self.db_max_connections,
            acquire_timeout: self.operation_timeout(),
        }
    }

    pub fn redis(&self) -> RedisConfig {
        RedisConfig {
            url: self.redis_url.clone(),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprints_separate_distinct_targets() {
        let a = DbConfig {
            url: "postgres://localhost/chat".into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(3),
        };
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.max_connections = 4;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn parse_or_falls_back_on_garbage() {
        // SAFETY: 仅本测试读写该变量
        unsafe { env::set_var("CHAT_TEST_PARSE_OR", "not-a-number") };
        assert_eq!(parse_or::<u64>("CHAT_TEST_PARSE_OR", 5), 5);
        unsafe { env::set_var("CHAT_TEST_PARSE_OR", "42") };
        assert_eq!(parse_or::<u64>("CHAT_TEST_PARSE_OR", 5), 42);
        unsafe { env::remove_var("CHAT_TEST_PARSE_OR") };
    }
}
