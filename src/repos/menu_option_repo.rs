/*
 * Responsibility
 * - menu_options テーブル向け SQLx 操作
 * - round 内でのメニュー重複チェックもここ
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct MenuOptionRow {
    pub id: i64,
    pub menu: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub price: Option<i32>,
    pub round_id: Option<i64>,
}

pub async fn insert(
    db: &PgPool,
    round_id: i64,
    menu: &str,
    kind: &str,
    price: Option<i32>,
) -> Result<MenuOptionRow, RepoError> {
    let row = sqlx::query_as::<_, MenuOptionRow>(
        r#"
        INSERT INTO menu_options (menu, type, price, round_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, menu, type, price, round_id
        "#,
    )
    .bind(menu)
    .bind(kind)
    .bind(price)
    .bind(round_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn list(db: &PgPool) -> Result<Vec<MenuOptionRow>, RepoError> {
    let rows = sqlx::query_as::<_, MenuOptionRow>(
        r#"
        SELECT id, menu, type, price, round_id
        FROM menu_options
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_by_round(db: &PgPool, round_id: i64) -> Result<Vec<MenuOptionRow>, RepoError> {
    let rows = sqlx::query_as::<_, MenuOptionRow>(
        r#"
        SELECT id, menu, type, price, round_id
        FROM menu_options
        WHERE round_id = $1
        ORDER BY id
        "#,
    )
    .bind(round_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, id: i64) -> Result<Option<MenuOptionRow>, RepoError> {
    let row = sqlx::query_as::<_, MenuOptionRow>(
        r#"
        SELECT id, menu, type, price, round_id
        FROM menu_options
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
    menu: &str,
    kind: &str,
    price: Option<i32>,
    round_id: Option<i64>,
) -> Result<Option<MenuOptionRow>, RepoError> {
    // round_id: None -> keep the current round
    let row = sqlx::query_as::<_, MenuOptionRow>(
        r#"
        UPDATE menu_options
        SET menu = $2, type = $3, price = $4, round_id = COALESCE($5, round_id)
        WHERE id = $1
        RETURNING id, menu, type, price, round_id
        "#,
    )
    .bind(id)
    .bind(menu)
    .bind(kind)
    .bind(price)
    .bind(round_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM menu_options
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn exists_by_round_and_menu(
    db: &PgPool,
    round_id: i64,
    menu: &str,
) -> Result<bool, RepoError> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM menu_options
            WHERE round_id = $1 AND menu = $2
        )
        "#,
    )
    .bind(round_id)
    .bind(menu)
    .fetch_one(db)
    .await?;

    Ok(exists)
}
