/// 缓存键模块
/// 提供各种缓存键生成函数

// 用户缓存键
pub mod user_keys;

// 好友缓存键
pub mod friend_keys;

pub use friend_keys::friends_key;
pub use user_keys::{user_key, user_nick_key, user_projection_keys, user_sign_key};
