/// 用户缓存键前缀
const USER_PREFIX: &str = "user:";

/// 完整用户资料快照
pub fn user_key(id: i64) -> String {
    format!("{}{}", USER_PREFIX, id)
}

/// 昵称投影
pub fn user_nick_key(id: i64) -> String {
    format!("{}{}:nick", USER_PREFIX, id)
}

/// 签名投影
pub fn user_sign_key(id: i64) -> String {
    format!("{}{}:sign", USER_PREFIX, id)
}

/// 用户资料变更后需要一起删除的全部键
pub fn user_projection_keys(id: i64) -> [String; 3] {
    [user_key(id), user_nick_key(id), user_sign_key(id)]
}
