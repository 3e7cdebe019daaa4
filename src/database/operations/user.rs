use crate::database::models::user::UserRow;
use crate::database::models::{NewUser, User, UserField};
use crate::database::store::Lookup;
use crate::error::{Error, Result};
use crate::utils::{self, now_naive};

use super::PgStore;

impl PgStore {
    /// 注册用户，参数不合法时不会访问数据库
    pub(super) async fn insert(&self, user: NewUser) -> Result<i64> {
        let user = user.validate(now_naive())?;
        let rtime = now_naive();

        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (nick, password, age, birthday, sign, country, sex, pnumber, rtime)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&user.nick)
        .bind(&user.password)
        .bind(user.age as i16)
        .bind(user.birthday)
        .bind(&user.sign)
        .bind(&user.country)
        .bind(user.sex.code())
        .bind(&user.phone_number)
        .bind(rtime)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!("Registered user {}", id);
        Ok(id)
    }

    pub(super) async fn update_field(&self, id: i64, field: UserField, value: &str) -> Result<()> {
        field.check(id, value)?;

        // 列名来自固定枚举，不是用户输入
        let sql = format!("UPDATE users SET {} = $1 WHERE id = $2", field.column());
        let mut tx = self.pool.begin().await?;
        let query = sqlx::query(&sql);
        let query = match field {
            UserField::Birthday => query.bind(utils::parse_time(value)?),
            _ => query.bind(value),
        };
        let result = query.bind(id).execute(&mut *tx).await.map_err(|e| {
            tracing::error!("exe update user {} error {:?}", field.column(), e);
            Error::from(e)
        })?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(Error::NotFound(format!(
                "update {} fail, because user {} is not exist",
                field.column(),
                id
            )));
        }
        tx.commit().await?;
        Ok(())
    }

    pub(super) async fn select_user(&self, id: i64) -> Result<Lookup<User>> {
        if id < 1 {
            return Err(Error::Validation("id must be greater than 0".into()));
        }
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, nick, password, age, birthday, sign, country, sex, pnumber
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => Lookup::Found(row.into()),
            None => Lookup::NotFound,
        })
    }

    pub(super) async fn select_column(&self, id: i64, column: &'static str) -> Result<Lookup<String>> {
        let sql = format!("SELECT {column} FROM users WHERE id = $1");
        let value: Option<String> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(match value {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound,
        })
    }
}
