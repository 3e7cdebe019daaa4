/// 好友缓存键前缀
const FRIEND_PREFIX: &str = "friend:";

/// 用户好友列表（序列化后的 JSON 数组）
pub fn friends_key(uid: i64) -> String {
    format!("{}{}:friends", FRIEND_PREFIX, uid)
}
