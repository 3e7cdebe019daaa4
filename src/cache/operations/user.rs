use std::sync::Arc;
use std::time::Duration;

use crate::cache::client::KvClient;
use crate::cache::keys::user_keys;
use crate::cache::models::user::CachedUser;
use crate::database::models::{NewUser, User, UserField};
use crate::database::store::{Lookup, Store};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
enum Projection {
    Nick,
    Sign,
}

/// 用户缓存操作
///
/// 读：先查缓存，未命中回源数据库并回填；写：先写数据库，再删除缓存。
/// 回填、删除失败只记日志，数据库错误原样返回。
#[derive(Clone)]
pub struct UserCacheOperations {
    kv: Arc<dyn KvClient>,
    store: Arc<dyn Store>,
    ttl: Duration,
}

impl UserCacheOperations {
    pub fn new(kv: Arc<dyn KvClient>, store: Arc<dyn Store>, ttl: Duration) -> Self {
        Self { kv, store, ttl }
    }

    /// 注册直接写库，新用户没有需要失效的缓存
    pub async fn register(&self, user: NewUser) -> Result<i64> {
        self.store.insert_user(user).await
    }

    /// 查询用户是否存在。
    ///
    /// 缓存报错不会当作“不存在”，一律回源数据库；数据库确认不存在返回 `Ok(false)`。
    pub async fn user_exists(&self, id: i64) -> Result<bool> {
        let key = user_keys::user_key(id);
        match self.kv.exists(&key).await {
            Ok(true) => {
                tracing::debug!("user {} is exist in cache", id);
                return Ok(true);
            }
            Ok(false) => tracing::debug!("user {} missed in cache", id),
            Err(e) => tracing::warn!("cache exe exists {} error {}", key, e),
        }

        match self.store.find_user(id).await? {
            Lookup::Found(user) => {
                self.seed_user(&user).await;
                Ok(true)
            }
            Lookup::NotFound => Ok(false),
        }
    }

    /// 与 `user_exists` 相同，但不存在时返回 `NotFound`
    pub async fn require_user(&self, id: i64) -> Result<()> {
        if self.user_exists(id).await? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("user {id} is not exist")))
        }
    }

    /// 登录并返回用户资料。
    ///
    /// 缓存命中时只和缓存中的密码比较，不访问数据库；未命中时在数据库校验，
    /// 校验通过后才写入缓存。
    pub async fn login_and_fetch(&self, id: i64, password: &str) -> Result<User> {
        let key = user_keys::user_key(id);
        match self.kv.get(&key).await {
            Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str::<CachedUser>(&raw) {
                Ok(cached) if cached.id == id => {
                    if cached.pwd != password {
                        return Err(Error::CredentialMismatch);
                    }
                    match cached.into_user() {
                        Ok(user) => return Ok(user),
                        Err(e) => tracing::warn!("cached user {} is corrupt: {}", id, e),
                    }
                }
                Ok(cached) => tracing::warn!(
                    "cached user id {} is not equal request user id {}",
                    cached.id,
                    id
                ),
                Err(e) => tracing::warn!("unmarshal user string error {}", e),
            },
            Ok(_) => tracing::debug!("user {} missed in cache", id),
            Err(e) => tracing::warn!("get user info from cache error {}", e),
        }

        let user = self.store.query_user_by_id(id).await?;
        if user.password != password {
            return Err(Error::CredentialMismatch);
        }
        self.seed_user(&user).await;
        Ok(user)
    }

    /// 更新单个字段，成功后删除完整资料和投影键
    pub async fn update_field(&self, id: i64, field: UserField, value: &str) -> Result<()> {
        self.store.update_user_field(id, field, value).await?;
        tracing::info!("user {} updated {}", id, field.column());
        self.invalidate_user(id).await;
        Ok(())
    }

    pub async fn update_password(&self, id: i64, new_password: &str) -> Result<()> {
        self.update_field(id, UserField::Password, new_password).await
    }

    pub async fn update_nick(&self, id: i64, new_nick: &str) -> Result<()> {
        self.update_field(id, UserField::Nick, new_nick).await
    }

    pub async fn update_sign(&self, id: i64, new_sign: &str) -> Result<()> {
        self.update_field(id, UserField::Sign, new_sign).await
    }

    pub async fn update_birthday(&self, id: i64, new_birthday: &str) -> Result<()> {
        self.update_field(id, UserField::Birthday, new_birthday).await
    }

    pub async fn invalidate_user(&self, id: i64) {
        let keys = user_keys::user_projection_keys(id);
        if let Err(e) = self.kv.del(&keys).await {
            tracing::warn!("delete user {} fail from cache: {}", id, e);
        }
    }

    pub async fn nick_by_id(&self, id: i64) -> Result<Lookup<String>> {
        self.projection(id, Projection::Nick).await
    }

    pub async fn sign_by_id(&self, id: i64) -> Result<Lookup<String>> {
        self.projection(id, Projection::Sign).await
    }

    /// 建立好友关系时使用的名字快照：优先昵称，昵称为空时用签名
    pub async fn display_name(&self, id: i64) -> Result<String> {
        match self.nick_by_id(id).await? {
            Lookup::Found(nick) if !nick.is_empty() => return Ok(nick),
            Lookup::Found(_) => {}
            Lookup::NotFound => return Err(Error::UnknownUser(id)),
        }
        match self.sign_by_id(id).await? {
            Lookup::Found(sign) if !sign.is_empty() => Ok(sign),
            _ => Err(Error::UnknownUser(id)),
        }
    }

    async fn projection(&self, id: i64, projection: Projection) -> Result<Lookup<String>> {
        let key = match projection {
            Projection::Nick => user_keys::user_nick_key(id),
            Projection::Sign => user_keys::user_sign_key(id),
        };
        match self.kv.get(&key).await {
            Ok(Some(value)) if !value.is_empty() => return Ok(Lookup::Found(value)),
            Ok(_) => tracing::debug!("{} is empty from cache", key),
            Err(e) => tracing::warn!("get {} from cache error {}", key, e),
        }

        let value = match projection {
            Projection::Nick => self.store.find_user_nick(id).await,
            Projection::Sign => self.store.find_user_sign(id).await,
        }
        .inspect_err(|e| tracing::error!("get {:?} of user {} from store error {}", projection, id, e))?;

        if let Lookup::Found(v) = &value {
            if !v.is_empty() {
                if let Err(e) = self.kv.set_ex(&key, v, self.ttl).await {
                    tracing::warn!("save {} to cache fail: {}", key, e);
                }
            }
        }
        Ok(value)
    }

    /// 回填完整资料，已存在则不覆盖
    async fn seed_user(&self, user: &User) {
        let key = user_keys::user_key(user.id);
        let json = match serde_json::to_string(&CachedUser::from(user)) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("marshal user {} error {}", user.id, e);
                return;
            }
        };
        match self.kv.set_nx_ex(&key, &json, self.ttl).await {
            Ok(written) => tracing::debug!("save user info to cache ({}, {})", key, written),
            Err(e) => tracing::warn!("save user info to cache ({}) fail: {}", key, e),
        }
    }
}
