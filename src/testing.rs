//! 单元测试用的内存实现：缓存、存储、时钟

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::cache::KvClient;
use crate::database::models::friend::{check_fnick, check_friend_id, check_owner};
use crate::database::models::{Friend, FriendEdge, NewUser, Sex, User, UserField};
use crate::database::store::{Lookup, Store};
use crate::error::{Error, Result};
use crate::infrastructure::Clock;
use crate::utils::{self, now_naive};

pub fn ann() -> NewUser {
    NewUser {
        nick: "Ann".into(),
        password: "x".into(),
        phone_number: "13800000000".into(),
        ..Default::default()
    }
}

pub fn bob() -> NewUser {
    NewUser {
        nick: "Bob".into(),
        password: "hunter2".into(),
        sign: "bob's sign".into(),
        phone_number: "13900000000".into(),
        ..Default::default()
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 内存缓存，支持过期时间和故障注入
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    failing: AtomicBool,
}

impl MemoryKv {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// 模拟 TTL 到期
    pub fn expire_all(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|(_, deadline)| *deadline > Instant::now())
            .map(|(v, _)| v.clone())
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(
            key.to_owned(),
            (value.to_owned(), Instant::now() + Duration::from_secs(60)),
        );
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::CacheUnavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl KvClient for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.raw(key))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.check()?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), (value.to_owned(), Instant::now() + ttl));
        Ok(())
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        self.check()?;
        if self.raw(key).is_some() {
            return Ok(false);
        }
        self.set_ex(key, value, ttl).await?;
        Ok(true)
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        Ok(keys.iter().filter(|k| entries.remove(*k).is_some()).count() as u64)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.check()?;
        Ok(self.raw(key).is_some())
    }
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    friends: Vec<Friend>,
    next_user_id: i64,
    next_friend_id: i64,
}

/// 内存存储，校验规则与 Postgres 实现一致，并记录每个方法的调用次数
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn starting_at(first_user_id: i64) -> Self {
        let store = Self::default();
        store.tables.lock().unwrap().next_user_id = first_user_id - 1;
        store
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// 跳过校验直接写入一行，用于构造昵称为空之类的数据
    pub fn put_user_raw(&self, nick: &str, sign: &str) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        tables.next_user_id += 1;
        let id = tables.next_user_id;
        tables.users.insert(
            id,
            User {
                id,
                nick: nick.into(),
                password: "raw".into(),
                age: 0,
                birthday: now_naive(),
                sign: sign.into(),
                country: "China".into(),
                sex: Sex::Female,
                phone_number: "13700000000".into(),
            },
        );
        id
    }

    fn enter(&self, method: &'static str) -> Result<()> {
        *self.calls.lock().unwrap().entry(method).or_default() += 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("pool timed out".into()));
        }
        Ok(())
    }

    fn column(&self, id: i64, pick: fn(&User) -> String) -> Lookup<String> {
        match self.tables.lock().unwrap().users.get(&id) {
            Some(user) => Lookup::Found(pick(user)),
            None => Lookup::NotFound,
        }
    }

    fn edit_friends<F>(&self, what: &str, mut matches: F, nick: Option<&str>) -> Result<()>
    where
        F: FnMut(&Friend) -> bool,
    {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.friends.len();
        let affected = match nick {
            Some(nick) => {
                let mut renamed = 0;
                for friend in tables.friends.iter_mut().filter(|f| matches(f)) {
                    friend.fnick = nick.to_owned();
                    renamed += 1;
                }
                renamed
            }
            None => {
                tables.friends.retain(|f| !matches(f));
                before - tables.friends.len()
            }
        };
        if affected == 0 {
            return Err(Error::NotFound(format!("{what}: rows affected is 0")));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<i64> {
        let mut user = user.validate(now_naive())?;
        self.enter("insert_user")?;
        let mut tables = self.tables.lock().unwrap();
        tables.next_user_id += 1;
        user.id = tables.next_user_id;
        tables.users.insert(user.id, user);
        Ok(tables.next_user_id)
    }

    async fn update_user_field(&self, id: i64, field: UserField, value: &str) -> Result<()> {
        field.check(id, value)?;
        self.enter("update_user_field")?;
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("user {id} is not exist")))?;
        match field {
            UserField::Password => user.password = value.to_owned(),
            UserField::Nick => user.nick = value.to_owned(),
            UserField::Sign => user.sign = value.to_owned(),
            UserField::Birthday => user.birthday = utils::parse_time(value)?,
        }
        Ok(())
    }

    async fn find_user(&self, id: i64) -> Result<Lookup<User>> {
        self.enter("find_user")?;
        if id < 1 {
            return Err(Error::Validation("id must be greater than 0".into()));
        }
        Ok(match self.tables.lock().unwrap().users.get(&id) {
            Some(user) => Lookup::Found(user.clone()),
            None => Lookup::NotFound,
        })
    }

    async fn find_user_nick(&self, id: i64) -> Result<Lookup<String>> {
        self.enter("find_user_nick")?;
        Ok(self.column(id, |u| u.nick.clone()))
    }

    async fn find_user_sign(&self, id: i64) -> Result<Lookup<String>> {
        self.enter("find_user_sign")?;
        Ok(self.column(id, |u| u.sign.clone()))
    }

    async fn add_friend_edge(&self, edge: &FriendEdge) -> Result<Friend> {
        edge.check_insert()?;
        self.enter("add_friend_edge")?;
        let mut tables = self.tables.lock().unwrap();
        tables.next_friend_id += 1;
        let friend = Friend {
            id: tables.next_friend_id,
            uid: edge.uid,
            fid: edge.fid,
            fnick: edge.fnick.clone(),
            etime: now_naive(),
        };
        tables.friends.push(friend.clone());
        Ok(friend)
    }

    async fn delete_friend_by_id(&self, id: i64) -> Result<()> {
        check_friend_id(id)?;
        self.enter("delete_friend_by_id")?;
        self.edit_friends("delete friend by id", |f| f.id == id, None)
    }

    async fn delete_friend_by_pair(&self, uid: i64, fid: i64) -> Result<()> {
        FriendEdge::pair(uid, fid).check_pair()?;
        self.enter("delete_friend_by_pair")?;
        self.edit_friends(
            "delete friend by pair",
            |f| f.uid == uid && f.fid == fid,
            None,
        )
    }

    async fn update_friend_nick_by_id(&self, id: i64, nick: &str) -> Result<()> {
        check_friend_id(id)?;
        check_fnick(nick)?;
        self.enter("update_friend_nick_by_id")?;
        self.edit_friends("rename friend by id", |f| f.id == id, Some(nick))
    }

    async fn update_friend_nick_by_pair(&self, uid: i64, fid: i64, nick: &str) -> Result<()> {
        FriendEdge::pair(uid, fid).check_pair()?;
        check_fnick(nick)?;
        self.enter("update_friend_nick_by_pair")?;
        self.edit_friends(
            "rename friend by pair",
            |f| f.uid == uid && f.fid == fid,
            Some(nick),
        )
    }

    async fn list_friends_by_owner(&self, uid: i64) -> Result<Vec<Friend>> {
        check_owner(uid)?;
        self.enter("list_friends_by_owner")?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.friends.iter().filter(|f| f.uid == uid).cloned().collect())
    }
}
