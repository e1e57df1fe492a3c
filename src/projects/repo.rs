use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub images: Vec<String>, // order preserved, first is the cover
    pub created_at: OffsetDateTime,
}

pub async fn create(
    db: &PgPool,
    user_id: i64,
    title: &str,
    description: &str,
    images: &[String],
) -> anyhow::Result<ProjectRow> {
    let row = sqlx::query_as::<_, ProjectRow>(
        r#"
        INSERT INTO projects (user_id, title, description, images)
        VALUES ($1, $2, $3, $4)
        RETURNING id, title, description, images, created_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(description)
    .bind(images)
    .fetch_one(db)
    .await
    .context("insert project")?;
    Ok(row)
}

/// Newest first.
pub async fn list_by_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<ProjectRow>> {
    let rows = sqlx::query_as::<_, ProjectRow>(
        r#"
        SELECT id, title, description, images, created_at
          FROM projects
         WHERE user_id = $1
         ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list projects by user")?;
    Ok(rows)
}

/// Deletes only if `user_id` owns the project; returns whether a row went.
pub async fn delete_owned(db: &PgPool, user_id: i64, project_id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
        .bind(project_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete project")?;
    Ok(res.rows_affected() > 0)
}
