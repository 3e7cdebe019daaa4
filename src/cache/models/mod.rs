/// 缓存数据模型
// 用户缓存模型
pub mod user;

pub use user::CachedUser;
