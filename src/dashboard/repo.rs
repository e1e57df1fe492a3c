use anyhow::Context;
use sqlx::PgPool;

use super::dto::{ProfileCard, PublicProfileRow};

/// Visible profiles ordered by id, optionally leaving out one user.
pub async fn list_visible(db: &PgPool, exclude: Option<i64>) -> anyhow::Result<Vec<ProfileCard>> {
    let rows = sqlx::query_as::<_, ProfileCard>(
        r#"
        SELECT id AS user_id, user_name, profile_image_url, job_interest,
               university, faculty, major, gpa::float8 AS gpa
          FROM users
         WHERE show_on_dashboard = TRUE
           AND ($1::BIGINT IS NULL OR id <> $1)
         ORDER BY id
        "#,
    )
    .bind(exclude)
    .fetch_all(db)
    .await
    .context("list dashboard profiles")?;
    Ok(rows)
}

/// `None` both for unknown ids and for hidden profiles.
pub async fn find_visible(db: &PgPool, user_id: i64) -> anyhow::Result<Option<PublicProfileRow>> {
    let row = sqlx::query_as::<_, PublicProfileRow>(
        r#"
        SELECT id AS user_id, email, user_name, phone, university, faculty, major,
               gpa::float8 AS gpa, job_interest, profile_image_url
          FROM users
         WHERE id = $1 AND show_on_dashboard = TRUE
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("find public profile")?;
    Ok(row)
}
