use anyhow::Context;
use sqlx::{FromRow, PgPool};

use super::dto::UpdateProfileRequest;
use crate::skills;

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub email: String,
    pub user_name: Option<String>,
    pub phone: Option<String>,
    pub university: Option<String>,
    pub faculty: Option<String>,
    pub major: Option<String>,
    pub gpa: Option<f64>,
    pub job_interest: Option<String>,
    pub profile_image_url: Option<String>,
    pub show_on_dashboard: bool,
}

fn blank_to_none(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub async fn find_profile(db: &PgPool, user_id: i64) -> anyhow::Result<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT id, email, user_name, phone, university, faculty, major,
               gpa::float8 AS gpa, job_interest, profile_image_url, show_on_dashboard
          FROM users
         WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("find profile")?;
    Ok(row)
}

/// Writes every profile column and, when given, swaps the skill set, all in
/// one transaction. Returns `false` if the user row is gone.
pub async fn update_profile(
    db: &PgPool,
    user_id: i64,
    input: &UpdateProfileRequest,
) -> anyhow::Result<bool> {
    let mut tx = db.begin().await.context("begin tx")?;

    let res = sqlx::query(
        r#"
        UPDATE users
           SET user_name = $1,
               phone = $2,
               university = $3,
               faculty = $4,
               major = $5,
               gpa = $6,
               job_interest = $7,
               profile_image_url = $8
         WHERE id = $9
        "#,
    )
    .bind(blank_to_none(&input.user_name))
    .bind(blank_to_none(&input.phone))
    .bind(blank_to_none(&input.university))
    .bind(blank_to_none(&input.faculty))
    .bind(blank_to_none(&input.major))
    .bind(input.gpa)
    .bind(blank_to_none(&input.job_interest))
    .bind(blank_to_none(&input.profile_image_url))
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .context("update profile")?;

    if res.rows_affected() == 0 {
        return Ok(false);
    }

    if let Some(names) = &input.skills {
        skills::unlink_all(&mut tx, user_id).await?;
        skills::link_all(&mut tx, user_id, names.as_slice()).await?;
    }

    tx.commit().await.context("commit tx")?;
    Ok(true)
}

/// Skills links and projects go with the row through `ON DELETE CASCADE`.
pub async fn delete_user(db: &PgPool, user_id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(db)
        .await
        .context("delete user")?;
    Ok(res.rows_affected() > 0)
}

pub async fn set_visibility(db: &PgPool, user_id: i64, show: bool) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE users SET show_on_dashboard = $1 WHERE id = $2")
        .bind(show)
        .bind(user_id)
        .execute(db)
        .await
        .context("set dashboard visibility")?;
    Ok(res.rows_affected() > 0)
}
