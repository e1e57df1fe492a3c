//! Skill catalog shared by registration and profile updates.

use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};

/// Trimmed, non-empty names with case-insensitive duplicates removed,
/// first spelling wins.
pub fn clean_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        let lower = name.to_lowercase();
        if out.iter().any(|n| n.to_lowercase() == lower) {
            continue;
        }
        out.push(name.to_string());
    }
    out
}

/// Id of the catalog entry matching `name` case-insensitively, creating it
/// on first use.
pub async fn resolve_or_create(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> anyhow::Result<i64> {
    let existing =
        sqlx::query_scalar::<_, i64>("SELECT id FROM skills WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
            .context("skill lookup")?;
    if let Some(id) = existing {
        return Ok(id);
    }

    // A concurrent request may have inserted the same name meanwhile.
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO skills (name) VALUES ($1)
        ON CONFLICT (LOWER(name)) DO UPDATE SET name = skills.name
        RETURNING id
        "#,
    )
    .bind(name)
    .fetch_one(&mut **tx)
    .await
    .context("insert skill")?;
    Ok(id)
}

/// Link every cleaned name to the user, ignoring links that already exist.
pub async fn link_all<S: AsRef<str>>(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    names: &[S],
) -> anyhow::Result<()> {
    for name in clean_names(names) {
        let skill_id = resolve_or_create(tx, &name).await?;
        sqlx::query(
            "INSERT INTO user_skills (user_id, skill_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(skill_id)
        .execute(&mut **tx)
        .await
        .context("link user skill")?;
    }
    Ok(())
}

pub async fn unlink_all(tx: &mut Transaction<'_, Postgres>, user_id: i64) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM user_skills WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await
        .context("unlink user skills")?;
    Ok(())
}

pub async fn list_for_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT s.name
          FROM user_skills us
          JOIN skills s ON s.id = us.skill_id
         WHERE us.user_id = $1
         ORDER BY s.name
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list user skills")?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_names_trims_and_skips_empty() {
        let got = clean_names(&["  Rust ", "", "   ", "SQL"]);
        assert_eq!(got, vec!["Rust".to_string(), "SQL".to_string()]);
    }

    #[test]
    fn clean_names_dedups_case_insensitively() {
        let got = clean_names(&["Go", "go", "GO ", "Docker"]);
        assert_eq!(got, vec!["Go".to_string(), "Docker".to_string()]);
    }
}
