/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - subject (user_id) からユーザーを引く（認証後の identity 解決に使う）
 * - DB エラーは RepoError/AppError に変換しやすい形で返す
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub user_id: String,
    pub role: String,
    pub team_id: Option<i64>,
}

pub async fn find_by_user_id(db: &PgPool, user_id: &str) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, user_id, role, team_id
        FROM users
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
