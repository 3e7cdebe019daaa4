// 缓存模块
// 包含缓存键、缓存数据结构、缓存客户端和缓存旁路操作

pub mod client;
pub mod keys;
pub mod models;
pub mod operations;

// 重新导出常用类型，方便其他模块使用
pub use client::{KvClient, RedisKv};
pub use models::CachedUser;
pub use operations::{FriendCacheOperations, UserCacheOperations};
