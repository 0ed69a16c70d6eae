/*
 * Responsibility
 * - teams テーブル向け SQLx 操作
 * - round の付け替え先 team の存在チェックに使う
 */
use sqlx::PgPool;

use crate::repos::error::RepoError;

pub async fn exists(db: &PgPool, team_id: i64) -> Result<bool, RepoError> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM teams
            WHERE id = $1
        )
        "#,
    )
    .bind(team_id)
    .fetch_one(db)
    .await?;

    Ok(exists)
}
