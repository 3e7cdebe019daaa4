// 数据库模块
// 包含实体定义、Store 抽象和 Postgres 实现

pub mod models;
pub mod operations;
pub mod store;

pub use models::{Friend, FriendEdge, NewUser, Sex, User, UserField};
pub use operations::PgStore;
pub use store::{Lookup, Store};
