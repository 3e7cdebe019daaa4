use async_trait::async_trait;

use crate::database::models::{Friend, FriendEdge, NewUser, User, UserField};
use crate::error::{Error, Result};

/// 查询结果：找到 / 确认不存在。查询失败走 `Err`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::NotFound => None,
        }
    }

    pub fn found_or(self, err: impl FnOnce() -> Error) -> Result<T> {
        self.into_option().ok_or_else(err)
    }
}

/// 关系库（唯一可信数据源）
#[async_trait]
pub trait Store: Send + Sync {
    /// 校验并写入用户，返回库分配的 id
    async fn insert_user(&self, user: NewUser) -> Result<i64>;

    /// 更新单个字段，影响行数为 0 时返回 `NotFound`
    async fn update_user_field(&self, id: i64, field: UserField, value: &str) -> Result<()>;

    async fn find_user(&self, id: i64) -> Result<Lookup<User>>;

    async fn find_user_nick(&self, id: i64) -> Result<Lookup<String>>;

    async fn find_user_sign(&self, id: i64) -> Result<Lookup<String>>;

    /// 写入好友关系，`fnick` 必须已由调用方解析好
    async fn add_friend_edge(&self, edge: &FriendEdge) -> Result<Friend>;

    async fn delete_friend_by_id(&self, id: i64) -> Result<()>;

    async fn delete_friend_by_pair(&self, uid: i64, fid: i64) -> Result<()>;

    async fn update_friend_nick_by_id(&self, id: i64, nick: &str) -> Result<()>;

    async fn update_friend_nick_by_pair(&self, uid: i64, fid: i64, nick: &str) -> Result<()>;

    async fn list_friends_by_owner(&self, uid: i64) -> Result<Vec<Friend>>;

    async fn query_user_by_id(&self, id: i64) -> Result<User> {
        self.find_user(id)
            .await?
            .found_or(|| Error::NotFound(format!("user {id} is not exist")))
    }

    /// 有关系 id 时先按 id 删除，按 id 没删到再按 (uid, fid) 删除
    async fn delete_friend_edge(&self, edge: &FriendEdge) -> Result<()> {
        if edge.has_id() {
            match self.delete_friend_by_id(edge.id).await {
                Ok(()) => return Ok(()),
                Err(Error::NotFound(msg)) if edge.check_pair().is_ok() => {
                    tracing::debug!("delete friend by id {} missed ({}), trying pair", edge.id, msg);
                }
                Err(e) => return Err(e),
            }
        }
        self.delete_friend_by_pair(edge.uid, edge.fid).await
    }

    /// 与 `delete_friend_edge` 相同的定位规则
    async fn update_friend_nickname(&self, edge: &FriendEdge) -> Result<()> {
        if edge.has_id() {
            match self.update_friend_nick_by_id(edge.id, &edge.fnick).await {
                Ok(()) => return Ok(()),
                Err(Error::NotFound(msg)) if edge.check_pair().is_ok() => {
                    tracing::debug!("rename friend by id {} missed ({}), trying pair", edge.id, msg);
                }
                Err(e) => return Err(e),
            }
        }
        self.update_friend_nick_by_pair(edge.uid, edge.fid, &edge.fnick)
            .await
    }
}
