use serde::{Deserialize, Serialize};

use crate::database::models::{Sex, User};
use crate::error::Result;
use crate::utils::{self, TIME_LAYOUT};

/// `user:{id}` 中保存的用户资料快照
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedUser {
    pub id: i64,
    pub nick: String,
    pub pwd: String,
    pub age: u8,
    pub birthday: String,
    pub sign: String,
    pub country: String,
    pub sex: Sex,
    pub pnumber: String,
}

impl From<&User> for CachedUser {
    fn from(user: &User) -> Self {
        CachedUser {
            id: user.id,
            nick: user.nick.clone(),
            pwd: user.password.clone(),
            age: user.age,
            birthday: user.birthday.format(TIME_LAYOUT).to_string(),
            sign: user.sign.clone(),
            country: user.country.clone(),
            sex: user.sex,
            pnumber: user.phone_number.clone(),
        }
    }
}

impl CachedUser {
    pub fn into_user(self) -> Result<User> {
        Ok(User {
            id: self.id,
            birthday: utils::parse_time(&self.birthday)?,
            nick: self.nick,
            password: self.pwd,
            age: self.age,
            sign: self.sign,
            country: self.country,
            sex: self.sex,
            phone_number: self.pnumber,
        })
    }
}
