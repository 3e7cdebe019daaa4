use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{Error, Result};
use crate::utils::{self, time_format};

/// 未填写国家时的默认值
pub const DEFAULT_COUNTRY: &str = "China";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    /// 表中 `sex` 列的取值：0 男，1 女
    pub fn code(self) -> i16 {
        match self {
            Sex::Male => 0,
            Sex::Female => 1,
        }
    }

    pub fn from_code(code: i16) -> Self {
        if code == 1 { Sex::Female } else { Sex::Male }
    }
}

/// 用户资料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nick: String,
    #[serde(rename = "pwd")]
    pub password: String,
    pub age: u8,
    #[serde(with = "time_format")]
    pub birthday: NaiveDateTime,
    pub sign: String,
    pub country: String,
    pub sex: Sex,
    #[serde(rename = "pnumber")]
    pub phone_number: String,
}

/// `users` 表中的一行
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub nick: String,
    pub password: String,
    pub age: i16,
    pub birthday: NaiveDateTime,
    pub sign: String,
    pub country: String,
    pub sex: i16,
    pub pnumber: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            nick: row.nick,
            password: row.password,
            age: row.age.clamp(0, u8::MAX as i16) as u8,
            birthday: row.birthday,
            sign: row.sign,
            country: row.country,
            sex: Sex::from_code(row.sex),
            phone_number: row.pnumber,
        }
    }
}

/// 注册请求携带的资料
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub nick: String,
    #[serde(rename = "pwd")]
    pub password: String,
    #[serde(default)]
    pub age: u8,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub sign: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sex: Sex,
    #[serde(rename = "pnumber")]
    pub phone_number: String,
}

impl NewUser {
    /// 校验必填项并补齐默认值，结果可以直接写库
    pub fn validate(self, now: NaiveDateTime) -> Result<User> {
        if self.nick.is_empty() {
            return Err(Error::Validation("name is empty".into()));
        }
        if self.password.is_empty() {
            return Err(Error::Validation("password is empty".into()));
        }
        verify_phone_number(&self.phone_number)?;

        let birthday = match self.birthday.as_deref() {
            None | Some("") => now,
            Some(raw) => utils::parse_time(raw)?,
        };
        let country = match self.country {
            Some(c) if !c.is_empty() => c,
            _ => DEFAULT_COUNTRY.to_owned(),
        };

        Ok(User {
            id: 0,
            nick: self.nick,
            password: self.password,
            age: self.age,
            birthday,
            sign: self.sign,
            country,
            sex: self.sex,
            phone_number: self.phone_number,
        })
    }
}

/// 手机号：11 位数字，首位非 0
pub fn verify_phone_number(phone: &str) -> Result<()> {
    if phone.len() != 11 {
        return Err(Error::Validation("phone number length must equal 11".into()));
    }
    if !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Validation("phone number all must be digit".into()));
    }
    if phone.starts_with('0') {
        return Err(Error::Validation(
            "phone number first must be greater than 0".into(),
        ));
    }
    Ok(())
}

/// 可以单独更新的用户字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Password,
    Nick,
    Sign,
    Birthday,
}

impl UserField {
    pub fn column(self) -> &'static str {
        match self {
            UserField::Password => "password",
            UserField::Nick => "nick",
            UserField::Sign => "sign",
            UserField::Birthday => "birthday",
        }
    }

    /// 写库前的参数检查，生日额外校验格式
    pub fn check(self, id: i64, value: &str) -> Result<()> {
        if id <= 0 {
            return Err(Error::Validation("user is invalid".into()));
        }
        if value.is_empty() {
            return Err(Error::Validation(format!("new {} is empty", self.column())));
        }
        if self == UserField::Birthday {
            utils::parse_time(value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> NewUser {
        NewUser {
            nick: "Ann".into(),
            password: "x".into(),
            phone_number: "13800000000".into(),
            ..Default::default()
        }
    }

    #[test]
    fn validate_fills_defaults() {
        let now = utils::parse_time("2024-05-01 10:00:00").unwrap();
        let user = ann().validate(now).unwrap();
        assert_eq!(user.country, DEFAULT_COUNTRY);
        assert_eq!(user.birthday, now);
        assert_eq!(user.sex, Sex::Male);
    }

    #[test]
    fn validate_rejects_missing_required_fields() {
        let now = utils::now_naive();
        let mut u = ann();
        u.nick.clear();
        assert!(matches!(u.validate(now), Err(Error::Validation(_))));

        let mut u = ann();
        u.password.clear();
        assert!(matches!(u.validate(now), Err(Error::Validation(_))));

        let mut u = ann();
        u.birthday = Some("yesterday".into());
        assert!(matches!(u.validate(now), Err(Error::Format(_))));
    }

    #[test]
    fn phone_numbers() {
        assert!(verify_phone_number("13800000000").is_ok());
        assert!(verify_phone_number("03800000000").is_err());
        assert!(verify_phone_number("1380000000").is_err());
        assert!(verify_phone_number("1380000000a").is_err());
        assert!(verify_phone_number("１3800000000").is_err());
    }

    #[test]
    fn field_checks() {
        assert!(UserField::Nick.check(1, "Bob").is_ok());
        assert!(matches!(UserField::Nick.check(0, "Bob"), Err(Error::Validation(_))));
        assert!(matches!(UserField::Sign.check(1, ""), Err(Error::Validation(_))));
        assert!(matches!(
            UserField::Birthday.check(1, "2001/01/01"),
            Err(Error::Format(_))
        ));
        assert!(UserField::Birthday.check(1, "2001-01-01 00:00:00").is_ok());
    }

    #[test]
    fn user_serializes_with_wire_names() {
        let now = utils::parse_time("2024-05-01 10:00:00").unwrap();
        let mut user = ann().validate(now).unwrap();
        user.id = 42;
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["pwd"], "x");
        assert_eq!(json["pnumber"], "13800000000");
        assert_eq!(json["birthday"], "2024-05-01 10:00:00");
        assert_eq!(json["sex"], "male");
    }
}
