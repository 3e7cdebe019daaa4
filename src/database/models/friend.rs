use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{Error, Result};
use crate::utils::time_format;

/// 好友关系（有向边 uid -> fid）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Friend {
    pub id: i64,
    pub uid: i64,
    pub fid: i64,
    /// 建立关系时好友昵称（或签名）的快照
    pub fnick: String,
    #[serde(with = "time_format")]
    pub etime: NaiveDateTime,
}

/// 添加、改备注、删除好友时调用方给出的参数；`id <= 0` 表示未提供
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FriendEdge {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub uid: i64,
    #[serde(default)]
    pub fid: i64,
    #[serde(default, alias = "new_nick")]
    pub fnick: String,
}

impl FriendEdge {
    pub fn pair(uid: i64, fid: i64) -> Self {
        Self {
            uid,
            fid,
            ..Default::default()
        }
    }

    /// 优先使用关系 id 定位
    pub fn has_id(&self) -> bool {
        self.id > 0
    }

    pub fn check_pair(&self) -> Result<()> {
        if self.uid < 1 {
            return Err(Error::Validation("uid is invalid".into()));
        }
        if self.fid < 1 {
            return Err(Error::Validation("fid is invalid".into()));
        }
        if self.uid == self.fid {
            return Err(Error::Validation("uid is equal fid".into()));
        }
        Ok(())
    }

    pub fn check_insert(&self) -> Result<()> {
        self.check_pair()?;
        check_fnick(&self.fnick)
    }
}

/// 关系 id 必须为正
pub fn check_friend_id(id: i64) -> Result<()> {
    if id < 1 {
        return Err(Error::Validation("id is invalid".into()));
    }
    Ok(())
}

pub fn check_owner(uid: i64) -> Result<()> {
    if uid < 1 {
        return Err(Error::Validation("uid is invalid".into()));
    }
    Ok(())
}

pub fn check_fnick(fnick: &str) -> Result<()> {
    if fnick.is_empty() {
        return Err(Error::Validation("fnick is empty".into()));
    }
    Ok(())
}

pub fn marshal_friends(friends: &[Friend]) -> serde_json::Result<String> {
    serde_json::to_string(friends)
}

pub fn unmarshal_friends(raw: &str) -> serde_json::Result<Vec<Friend>> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_time;

    #[test]
    fn edge_checks() {
        assert!(FriendEdge::pair(1, 2).check_pair().is_ok());
        assert!(FriendEdge::pair(0, 2).check_pair().is_err());
        assert!(FriendEdge::pair(2, 0).check_pair().is_err());
        assert!(FriendEdge::pair(2, 2).check_pair().is_err());
        assert!(matches!(
            FriendEdge::pair(1, 2).check_insert(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn friend_list_keeps_order_through_json() {
        let etime = parse_time("2023-01-01 12:00:00").unwrap();
        let friends = vec![
            Friend { id: 9, uid: 42, fid: 7, fnick: "Zed".into(), etime },
            Friend { id: 3, uid: 42, fid: 43, fnick: "Amy".into(), etime },
        ];
        let raw = marshal_friends(&friends).unwrap();
        assert_eq!(unmarshal_friends(&raw).unwrap(), friends);
        assert!(unmarshal_friends("{not json").is_err());
    }

    #[test]
    fn rename_request_accepts_new_nick() {
        let edge: FriendEdge =
            serde_json::from_str(r#"{"id":0,"uid":1,"fid":2,"new_nick":"pal"}"#).unwrap();
        assert_eq!(edge.fnick, "pal");
        assert!(!edge.has_id());
    }
}
