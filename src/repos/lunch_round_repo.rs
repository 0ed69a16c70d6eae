/*
 * Responsibility
 * - lunch_rounds テーブル向け SQLx 操作
 * - PgPool を受け取り CRUD を提供
 * - 「同じ作成者が同じ日に 1 ラウンドまで」の存在チェックもここ
 */
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct LunchRoundRow {
    pub id: i64,
    pub date: NaiveDate,
    pub status: String,
    pub team_id: Option<i64>,
    pub creator_id: Option<i64>,
}

pub async fn create(
    db: &PgPool,
    date: NaiveDate,
    status: &str,
    team_id: Option<i64>,
    creator_id: i64,
) -> Result<LunchRoundRow, RepoError> {
    let row = sqlx::query_as::<_, LunchRoundRow>(
        r#"
        INSERT INTO lunch_rounds (date, status, team_id, creator_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, date, status, team_id, creator_id
        "#,
    )
    .bind(date)
    .bind(status)
    .bind(team_id)
    .bind(creator_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn list(db: &PgPool) -> Result<Vec<LunchRoundRow>, RepoError> {
    let rows = sqlx::query_as::<_, LunchRoundRow>(
        r#"
        SELECT id, date, status, team_id, creator_id
        FROM lunch_rounds
        ORDER BY date DESC, id DESC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, id: i64) -> Result<Option<LunchRoundRow>, RepoError> {
    let row = sqlx::query_as::<_, LunchRoundRow>(
        r#"
        SELECT id, date, status, team_id, creator_id
        FROM lunch_rounds
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: i64,
    date: NaiveDate,
    status: &str,
    team_id: i64,
    creator_id: i64,
) -> Result<Option<LunchRoundRow>, RepoError> {
    let row = sqlx::query_as::<_, LunchRoundRow>(
        r#"
        UPDATE lunch_rounds
        SET date = $2, status = $3, team_id = $4, creator_id = $5
        WHERE id = $1
        RETURNING id, date, status, team_id, creator_id
        "#,
    )
    .bind(id)
    .bind(date)
    .bind(status)
    .bind(team_id)
    .bind(creator_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM lunch_rounds
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn exists_by_creator_and_date(
    db: &PgPool,
    creator_id: i64,
    date: NaiveDate,
) -> Result<bool, RepoError> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM lunch_rounds
            WHERE creator_id = $1 AND date = $2
        )
        "#,
    )
    .bind(creator_id)
    .bind(date)
    .fetch_one(db)
    .await?;

    Ok(exists)
}
