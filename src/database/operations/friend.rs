use crate::database::models::friend::{check_fnick, check_friend_id, check_owner};
use crate::database::models::{Friend, FriendEdge};
use crate::error::{Error, Result};
use crate::utils::now_naive;

use super::PgStore;

fn nothing_affected(what: &str) -> Error {
    Error::NotFound(format!("{what}: rows affected is 0"))
}

impl PgStore {
    pub(super) async fn insert_friend(&self, edge: &FriendEdge) -> Result<Friend> {
        edge.check_insert()?;
        let etime = now_naive();

        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO friends (uid, fid, fnick, etime)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(edge.uid)
        .bind(edge.fid)
        .bind(&edge.fnick)
        .bind(etime)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!("Added friend {} -> {} as {}", edge.uid, edge.fid, id);
        Ok(Friend {
            id,
            uid: edge.uid,
            fid: edge.fid,
            fnick: edge.fnick.clone(),
            etime,
        })
    }

    pub(super) async fn delete_by_id(&self, id: i64) -> Result<()> {
        check_friend_id(id)?;
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM friends WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(nothing_affected("delete friend by id"));
        }
        tx.commit().await?;
        Ok(())
    }

    pub(super) async fn delete_by_pair(&self, uid: i64, fid: i64) -> Result<()> {
        FriendEdge::pair(uid, fid).check_pair()?;
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM friends WHERE uid = $1 AND fid = $2")
            .bind(uid)
            .bind(fid)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(nothing_affected("delete friend by pair"));
        }
        tx.commit().await?;
        Ok(())
    }

    pub(super) async fn rename_by_id(&self, id: i64, nick: &str) -> Result<()> {
        check_friend_id(id)?;
        check_fnick(nick)?;
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("UPDATE friends SET fnick = $1 WHERE id = $2")
            .bind(nick)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(nothing_affected("rename friend by id"));
        }
        tx.commit().await?;
        Ok(())
    }

    pub(super) async fn rename_by_pair(&self, uid: i64, fid: i64, nick: &str) -> Result<()> {
        FriendEdge::pair(uid, fid).check_pair()?;
        check_fnick(nick)?;
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("UPDATE friends SET fnick = $1 WHERE uid = $2 AND fid = $3")
            .bind(nick)
            .bind(uid)
            .bind(fid)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(nothing_affected("rename friend by pair"));
        }
        tx.commit().await?;
        Ok(())
    }

    pub(super) async fn select_friends(&self, uid: i64) -> Result<Vec<Friend>> {
        check_owner(uid)?;
        let friends = sqlx::query_as::<_, Friend>(
            r#"
            SELECT id, uid, fid, fnick, etime
            FROM friends
            WHERE uid = $1
            ORDER BY id
            "#,
        )
        .bind(uid)
        .fetch_all(&self.pool)
        .await?;
        Ok(friends)
    }
}
