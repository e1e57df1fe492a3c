use crate::auth::repo_types::{User, VerificationCode};
use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;

/// Columns written at registration; email must already be normalized.
#[derive(Debug, Default)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub user_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub university: Option<&'a str>,
    pub faculty: Option<&'a str>,
    pub major: Option<&'a str>,
    pub gpa: Option<f64>,
    pub job_interest: Option<&'a str>,
}

impl User {
    /// Case-insensitive lookup by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    /// Insert a user row; a duplicate email surfaces as a unique violation.
    pub async fn create_tx(
        tx: &mut Transaction<'_, Postgres>,
        new: &NewUser<'_>,
    ) -> anyhow::Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, password_hash, user_name, phone,
                               university, faculty, major, gpa, job_interest)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.user_name)
        .bind(new.phone)
        .bind(new.university)
        .bind(new.faculty)
        .bind(new.major)
        .bind(new.gpa)
        .bind(new.job_interest)
        .fetch_one(&mut **tx)
        .await
        .context("insert user")?;
        Ok(id)
    }

    /// Returns the id of the updated user, or `None` if no email matched.
    pub async fn update_password_tx(
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<i64>> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE users SET password_hash = $1
            WHERE LOWER(email) = LOWER($2)
            RETURNING id
            "#,
        )
        .bind(password_hash)
        .bind(email)
        .fetch_optional(&mut **tx)
        .await
        .context("update password")?;
        Ok(id)
    }
}

impl VerificationCode {
    /// Drop the user's unused codes and store a fresh one, atomically.
    pub async fn replace_for_user(
        db: &PgPool,
        user_id: i64,
        code: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<i64> {
        let mut tx = db.begin().await.context("begin tx")?;

        sqlx::query("DELETE FROM verification_codes WHERE user_id = $1 AND is_used = FALSE")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("delete unused codes")?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO verification_codes (user_id, code, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(code)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await
        .context("insert verification code")?;

        tx.commit().await.context("commit tx")?;
        Ok(id)
    }

    /// Most recently issued unused code for the account behind `email`.
    pub async fn latest_unused_for_email(
        db: &PgPool,
        email: &str,
    ) -> anyhow::Result<Option<VerificationCode>> {
        let row = sqlx::query_as::<_, VerificationCode>(
            r#"
            SELECT vc.code, vc.expires_at
              FROM verification_codes vc
              JOIN users u ON u.id = vc.user_id
             WHERE LOWER(u.email) = LOWER($1) AND vc.is_used = FALSE
             ORDER BY vc.created_at DESC, vc.id DESC
             LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
        .context("latest unused code")?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM verification_codes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("delete verification code")?;
        Ok(())
    }

    pub async fn delete_all_for_user_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
    ) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM verification_codes WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await
            .context("delete user codes")?;
        Ok(res.rows_affected())
    }
}
