use std::collections::HashMap;
use std::time::Duration;

use redis::aio::MultiplexedConnection;
use sqlx::Executor;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::Mutex;

use crate::config::{DbConfig, RedisConfig};
use crate::error::Result;

/// 进程级连接注册表。每种配置只创建一个连接池 / 连接，之后复用。
#[derive(Default)]
pub struct Registry {
    pools: Mutex<HashMap<String, PgPool>>,
    redis: Mutex<HashMap<String, MultiplexedConnection>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取连接池。池是惰性连接的，第一次查询时才真正建立连接。
    pub async fn pg_pool(&self, config: &DbConfig) -> Result<PgPool> {
        let key = config.fingerprint();
        let mut pools = self.pools.lock().await;
        if let Some(pool) = pools.get(&key) {
            return Ok(pool.clone());
        }

        tracing::info!("Creating Postgres pool (max {} connections)", config.max_connections);
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Duration::from_secs(180))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET application_name = 'chat_backend';").await?;
                    Ok(())
                })
            })
            .connect_lazy(&config.url)?;
        pools.insert(key, pool.clone());
        Ok(pool)
    }

    pub async fn redis_connection(&self, config: &RedisConfig) -> Result<MultiplexedConnection> {
        let key = config.fingerprint();
        let mut conns = self.redis.lock().await;
        if let Some(conn) = conns.get(&key) {
            return Ok(conn.clone());
        }

        tracing::info!("Connecting to Redis");
        let client = redis::Client::open(config.url.as_str())?;
        let conn = client.get_multiplexed_async_connection().await?;
        conns.insert(key, conn.clone());
        Ok(conn)
    }

    #[cfg(test)]
    async fn pool_count(&self) -> usize {
        self.pools.lock().await.len()
    }
}
