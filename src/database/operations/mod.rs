// 关系库操作
// Postgres 实现的 Store，每次写入都在事务中完成

mod friend;
mod user;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::{Friend, FriendEdge, NewUser, User, UserField};
use crate::database::store::{Lookup, Store};
use crate::error::Result;
use crate::utils::with_deadline;

/// 基于 Postgres 连接池的存储实现
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<i64> {
        with_deadline(self.timeout, "insert user", self.insert(user)).await
    }

    async fn update_user_field(&self, id: i64, field: UserField, value: &str) -> Result<()> {
        with_deadline(self.timeout, "update user", self.update_field(id, field, value)).await
    }

    async fn find_user(&self, id: i64) -> Result<Lookup<User>> {
        with_deadline(self.timeout, "query user", self.select_user(id)).await
    }

    async fn find_user_nick(&self, id: i64) -> Result<Lookup<String>> {
        with_deadline(self.timeout, "query nick", self.select_column(id, "nick")).await
    }

    async fn find_user_sign(&self, id: i64) -> Result<Lookup<String>> {
        with_deadline(self.timeout, "query sign", self.select_column(id, "sign")).await
    }

    async fn add_friend_edge(&self, edge: &FriendEdge) -> Result<Friend> {
        with_deadline(self.timeout, "insert friend", self.insert_friend(edge)).await
    }

    async fn delete_friend_by_id(&self, id: i64) -> Result<()> {
        with_deadline(self.timeout, "delete friend", self.delete_by_id(id)).await
    }

    async fn delete_friend_by_pair(&self, uid: i64, fid: i64) -> Result<()> {
        with_deadline(self.timeout, "delete friend", self.delete_by_pair(uid, fid)).await
    }

    async fn update_friend_nick_by_id(&self, id: i64, nick: &str) -> Result<()> {
        with_deadline(self.timeout, "rename friend", self.rename_by_id(id, nick)).await
    }

    async fn update_friend_nick_by_pair(&self, uid: i64, fid: i64, nick: &str) -> Result<()> {
        with_deadline(
            self.timeout,
            "rename friend",
            self.rename_by_pair(uid, fid, nick),
        )
        .await
    }

    async fn list_friends_by_owner(&self, uid: i64) -> Result<Vec<Friend>> {
        with_deadline(self.timeout, "query friends", self.select_friends(uid)).await
    }
}
