use std::sync::Arc;
use std::time::Duration;

use crate::cache::client::KvClient;
use crate::cache::keys::friends_key;
use crate::cache::operations::user::UserCacheOperations;
use crate::database::models::friend::{marshal_friends, unmarshal_friends};
use crate::database::models::{Friend, FriendEdge};
use crate::database::store::Store;
use crate::error::Result;

/// 好友缓存操作，缓存整份好友列表，任何变更都删除列表键
#[derive(Clone)]
pub struct FriendCacheOperations {
    kv: Arc<dyn KvClient>,
    store: Arc<dyn Store>,
    users: UserCacheOperations,
    ttl: Duration,
}

impl FriendCacheOperations {
    pub fn new(kv: Arc<dyn KvClient>, store: Arc<dyn Store>, ttl: Duration) -> Self {
        let users = UserCacheOperations::new(kv.clone(), store.clone(), ttl);
        Self {
            kv,
            store,
            users,
            ttl,
        }
    }

    /// 添加好友。属主必须存在，再解析好友当前的名字作为备注快照，任一步失败都不写库。
    pub async fn add_friend(&self, mut edge: FriendEdge) -> Result<Friend> {
        edge.check_pair()?;
        self.users.require_user(edge.uid).await.inspect_err(|e| {
            tracing::info!("add friend {} -> {} rejected: {}", edge.uid, edge.fid, e)
        })?;
        edge.fnick = self.users.display_name(edge.fid).await.inspect_err(|e| {
            tracing::info!("add friend {} -> {} rejected: {}", edge.uid, edge.fid, e)
        })?;

        let friend = self.store.add_friend_edge(&edge).await?;
        tracing::info!("friend {} added: {} -> {}", friend.id, friend.uid, friend.fid);
        self.invalidate_friends(edge.uid).await;
        Ok(friend)
    }

    /// 删除好友，定位规则同 `Store::delete_friend_edge`
    pub async fn remove_friend(&self, edge: &FriendEdge) -> Result<()> {
        self.store.delete_friend_edge(edge).await?;
        // 只给了关系 id 时不知道属主，列表键等 TTL 过期
        if edge.uid > 0 {
            self.invalidate_friends(edge.uid).await;
        }
        Ok(())
    }

    /// 修改好友备注
    pub async fn rename_friend(&self, edge: &FriendEdge) -> Result<()> {
        self.store.update_friend_nickname(edge).await?;
        if edge.uid > 0 {
            self.invalidate_friends(edge.uid).await;
        }
        Ok(())
    }

    /// 获取好友列表。缓存内容损坏时当作未命中，回源后重新写入。
    pub async fn list_friends(&self, uid: i64) -> Result<Vec<Friend>> {
        let key = friends_key(uid);
        match self.kv.get(&key).await {
            Ok(Some(raw)) if !raw.is_empty() => match unmarshal_friends(&raw) {
                Ok(friends) => return Ok(friends),
                Err(e) => tracing::warn!("unmarshal {} error {}", key, e),
            },
            Ok(_) => tracing::debug!("friends is empty from cache"),
            Err(e) => tracing::warn!("get friends from cache error {}", e),
        }

        let friends = self.store.list_friends_by_owner(uid).await?;
        match marshal_friends(&friends) {
            Ok(raw) => {
                if let Err(e) = self.kv.set_ex(&key, &raw, self.ttl).await {
                    tracing::warn!("save {} to cache fail: {}", key, e);
                }
            }
            Err(e) => tracing::warn!("marshal friends error {}", e),
        }
        Ok(friends)
    }

    async fn invalidate_friends(&self, uid: i64) {
        let key = friends_key(uid);
        if let Err(e) = self.kv.del(&[key.clone()]).await {
            tracing::warn!("del {} error {}", key, e);
        }
    }
}
