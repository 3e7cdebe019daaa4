use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

use crate::error::Result;
use crate::utils::with_deadline;

/// 缓存客户端抽象，只暴露缓存旁路需要的几个命令
#[async_trait]
pub trait KvClient: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// 键不存在时才写入，返回是否写入
    async fn set_nx_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// 返回实际删除的键数量
    async fn del(&self, keys: &[String]) -> Result<u64>;

    async fn exists(&self, key: &str) -> Result<bool>;
}

/// Redis 过期时间最小 1 秒
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// 基于多路复用连接的 Redis 客户端，连接由注册表统一创建并复用
#[derive(Clone)]
pub struct RedisKv {
    conn: MultiplexedConnection,
    timeout: Duration,
}

impl RedisKv {
    pub fn new(conn: MultiplexedConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }
}

#[async_trait]
impl KvClient for RedisKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        with_deadline(self.timeout, "redis GET", async move {
            let value: Option<String> = conn.get(key).await?;
            Ok(value)
        })
        .await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        with_deadline(self.timeout, "redis SETEX", async move {
            let _: () = conn.set_ex(key, value, ttl_secs(ttl)).await?;
            Ok(())
        })
        .await
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();
        with_deadline(self.timeout, "redis SET NX", async move {
            let reply: Option<String> = redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("NX")
                .arg("EX")
                .arg(ttl_secs(ttl))
                .query_async(&mut conn)
                .await?;
            Ok(reply.is_some())
        })
        .await
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        with_deadline(self.timeout, "redis DEL", async move {
            let removed: u64 = conn.del(keys.to_vec()).await?;
            Ok(removed)
        })
        .await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        with_deadline(self.timeout, "redis EXISTS", async move {
            let found: bool = conn.exists(key).await?;
            Ok(found)
        })
        .await
    }
}
