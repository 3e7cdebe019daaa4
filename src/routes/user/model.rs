use serde::{Deserialize, Serialize};

use crate::database::models::{Sex, User};
use crate::error::{Error, Result};
use crate::utils::TIME_LAYOUT;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub id: i64,
    pub pwd: String,
}

impl LoginRequest {
    pub fn check(&self) -> Result<()> {
        if self.id <= 0 {
            return Err(Error::Validation("uid invalid".into()));
        }
        if self.pwd.is_empty() {
            return Err(Error::Validation("pwd is empty".into()));
        }
        Ok(())
    }
}

/// 登录返回的资料，不含密码
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: i64,
    pub nick: String,
    pub sign: String,
    pub birthday: String,
    pub age: u8,
    pub sex: Sex,
    pub country: String,
    pub token: String,
}

impl LoginResponse {
    pub fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            nick: user.nick,
            sign: user.sign,
            birthday: user.birthday.format(TIME_LAYOUT).to_string(),
            age: user.age,
            sex: user.sex,
            country: user.country,
            token,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub id: i64,
    pub new_pwd: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNickRequest {
    pub id: i64,
    pub new_nick: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSignRequest {
    pub id: i64,
    pub new_sign: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBirthdayRequest {
    pub id: i64,
    pub new_birthday: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub id: i64,
    pub exists: bool,
}
