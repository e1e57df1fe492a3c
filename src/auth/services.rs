use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::{error, info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        otp::{check_code, generate_otp},
        password::{hash_password, verify_password, verify_unknown_account},
        repo::NewUser,
        repo_types::{User, VerificationCode},
    },
    error::{is_unique_violation, AppError},
    skills,
    state::AppState,
    users::dto::validate_gpa,
};

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Validates a registration payload and returns the normalized email.
pub(crate) fn validate_registration(payload: &RegisterRequest) -> Result<String, AppError> {
    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    validate_gpa(payload.gpa)?;
    Ok(email)
}

/// Creates the user and links its skills in one transaction.
pub async fn register(db: &PgPool, payload: &RegisterRequest) -> Result<i64, AppError> {
    let email = validate_registration(payload)?;
    let hash = hash_password(&payload.password)?;

    let new = NewUser {
        email: &email,
        password_hash: &hash,
        user_name: non_blank(&payload.user_name),
        phone: non_blank(&payload.phone),
        university: non_blank(&payload.university),
        faculty: non_blank(&payload.faculty),
        major: non_blank(&payload.major),
        gpa: payload.gpa,
        job_interest: non_blank(&payload.job_interest),
    };

    // Dropping `tx` on any early return rolls the whole registration back.
    let mut tx = db.begin().await?;
    let user_id = match User::create_tx(&mut tx, &new).await {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }
        Err(e) => return Err(e.into()),
    };
    skills::link_all(&mut tx, user_id, payload.skills.as_slice()).await?;
    tx.commit().await?;

    info!(user_id, email = %email, "user registered");
    Ok(user_id)
}

/// Checks credentials and returns a signed token with the user record.
pub async fn login(
    db: &PgPool,
    keys: &JwtKeys,
    payload: &LoginRequest,
) -> Result<(String, User), AppError> {
    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let Some(user) = User::find_by_email(db, &email).await? else {
        verify_unknown_account(&payload.password);
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.sign(user.id)?;
    info!(user_id = user.id, "user logged in");
    Ok((token, user))
}

/// Issues a fresh reset code for `email` and mails it.
pub async fn issue_reset_code(state: &AppState, email: &str) -> Result<(), AppError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AppError::validation("Email is required"));
    }

    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(email = %email, "reset requested for unknown email");
        return Err(AppError::UserNotFound);
    };

    let ttl = state.config.otp_ttl_minutes;
    let code = generate_otp();
    let expires_at = OffsetDateTime::now_utc() + Duration::minutes(ttl);
    let code_id = VerificationCode::replace_for_user(&state.db, user.id, &code, expires_at).await?;

    if let Err(e) = state.mailer.send_otp(&user.email, &code, ttl).await {
        error!(user_id = user.id, error = %e, "verification code delivery failed");
        if let Err(e) = VerificationCode::delete(&state.db, code_id).await {
            error!(user_id = user.id, error = %e, "could not discard undelivered code");
        }
        return Err(AppError::DeliveryFailed);
    }

    info!(user_id = user.id, "verification code sent");
    Ok(())
}

/// Validates `otp` against the newest unused code. The code stays usable
/// until the password is reset or it expires.
pub async fn verify_reset_code(
    db: &PgPool,
    email: &str,
    otp: &str,
    now: OffsetDateTime,
) -> Result<(), AppError> {
    let email = normalize_email(email);
    let stored = VerificationCode::latest_unused_for_email(db, &email)
        .await?
        .ok_or(AppError::InvalidOrExpiredCode)?;
    check_code(&stored, otp, now)
}

/// Replaces the password hash and drops every code the user holds.
pub async fn reset_password(db: &PgPool, email: &str, password: &str) -> Result<(), AppError> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }
    let hash = hash_password(password)?;

    let mut tx = db.begin().await.map_err(|e| {
        error!(error = %e, "begin reset tx failed");
        AppError::ResetFailed
    })?;

    let user_id = match User::update_password_tx(&mut tx, &email, &hash).await {
        Ok(Some(id)) => id,
        Ok(None) => return Err(AppError::UserNotFound),
        Err(e) => {
            error!(error = %e, "update password failed");
            return Err(AppError::ResetFailed);
        }
    };

    let removed = VerificationCode::delete_all_for_user_tx(&mut tx, user_id)
        .await
        .map_err(|e| {
            error!(user_id, error = %e, "delete codes failed");
            AppError::ResetFailed
        })?;

    tx.commit().await.map_err(|e| {
        error!(user_id, error = %e, "commit reset failed");
        AppError::ResetFailed
    })?;

    info!(user_id, removed_codes = removed, "password reset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str, password: &str, gpa: Option<f64>) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            user_name: None,
            phone: None,
            university: None,
            faculty: None,
            major: None,
            gpa,
            job_interest: None,
            skills: vec![],
        }
    }

    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  A@x.com "), "a@x.com");
        assert_eq!(normalize_email("a@X.com"), "a@x.com");
    }

    #[test]
    fn email_regex() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("not an email"));
    }

    #[test]
    fn registration_requires_email_and_password() {
        assert!(matches!(
            validate_registration(&registration("   ", "p1", None)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_registration(&registration("a@x.com", "", None)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn registration_normalizes_email() {
        let email = validate_registration(&registration("A@x.com", "p1", None)).unwrap();
        assert_eq!(email, "a@x.com");
    }

    #[test]
    fn registration_checks_gpa_range() {
        assert!(validate_registration(&registration("a@x.com", "p1", Some(4.01))).is_err());
        assert!(validate_registration(&registration("a@x.com", "p1", Some(4.0))).is_ok());
    }

    #[test]
    fn non_blank_drops_whitespace() {
        assert_eq!(non_blank(&Some("  ".into())), None);
        assert_eq!(non_blank(&Some(" KU ".into())), Some("KU"));
        assert_eq!(non_blank(&None), None);
    }
}
