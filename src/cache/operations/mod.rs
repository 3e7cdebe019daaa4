/// 缓存操作
/// 缓存旁路的读写实现

// 用户缓存操作
pub mod user;

// 好友缓存操作
pub mod friend;

pub use friend::FriendCacheOperations;
pub use user::UserCacheOperations;
