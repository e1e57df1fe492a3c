//! Scenarios that need a live postgres. Run with
//! `DATABASE_URL=... cargo test -- --ignored`.

use std::sync::Arc;

use sqlx::PgPool;
use time::{Duration, OffsetDateTime};

use super::{
    dto::{LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    repo_types::{User, VerificationCode},
    services,
};
use crate::{
    error::AppError,
    state::{testing::RecordingMailer, AppState},
};

fn registration(email: &str, password: &str, skills: &[&str]) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        password: password.into(),
        user_name: Some("Nut".into()),
        phone: Some("0812345678".into()),
        university: None,
        faculty: None,
        major: None,
        gpa: Some(3.5),
        job_interest: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

fn login_req(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: password.into(),
    }
}

fn last_code(mailer: &RecordingMailer) -> String {
    mailer.sent.lock().unwrap().last().unwrap().1.clone()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn register_normalizes_and_rejects_duplicates(db: PgPool) {
    let id = services::register(&db, &registration(" A@x.com ", "p1", &[]))
        .await
        .unwrap();
    let user = User::find_by_email(&db, "a@x.com").await.unwrap().unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.email, "a@x.com");

    let err = services::register(&db, &registration("a@X.COM", "p2", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateEmail));
}

async fn count(db: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn skill_failure_rolls_back_registration(db: PgPool) {
    // Postgres refuses NUL in text, so the second skill fails after the
    // user row and the first skill are already written.
    let err = services::register(&db, &registration("z@x.com", "p1", &["Rust", "bad\0name"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));

    assert_eq!(count(&db, "users").await, 0);
    assert_eq!(count(&db, "skills").await, 0);
    assert_eq!(count(&db, "user_skills").await, 0);
    assert!(User::find_by_email(&db, "z@x.com").await.unwrap().is_none());

    // The email is free again.
    services::register(&db, &registration("z@x.com", "p1", &["Rust"]))
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn login_matches_subject_and_rejects_bad_credentials(db: PgPool) {
    let state = AppState::with_pool(db.clone(), Arc::new(RecordingMailer::default()));
    let keys = JwtKeys::from(&state.config.jwt);
    let id = services::register(&db, &registration("A@x.com", "p1", &[]))
        .await
        .unwrap();

    let (token, _) = services::login(&db, &keys, &login_req("a@X.com", "p1"))
        .await
        .unwrap();
    assert_eq!(keys.verify(&token).unwrap().sub, id);

    let wrong = services::login(&db, &keys, &login_req("a@x.com", "nope")).await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
    let missing = services::login(&db, &keys, &login_req("b@x.com", "p1")).await;
    assert!(matches!(missing, Err(AppError::InvalidCredentials)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn second_code_invalidates_first(db: PgPool) {
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::with_pool(db.clone(), mailer.clone());
    services::register(&db, &registration("a@x.com", "p1", &[]))
        .await
        .unwrap();

    services::issue_reset_code(&state, "a@x.com").await.unwrap();
    let first = last_code(&mailer);
    services::issue_reset_code(&state, "a@x.com").await.unwrap();
    let second = last_code(&mailer);

    let now = OffsetDateTime::now_utc();
    if first != second {
        let err = services::verify_reset_code(&db, "a@x.com", &first, now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCode));
    }
    services::verify_reset_code(&db, "a@x.com", &second, now)
        .await
        .unwrap();

    let err = services::verify_reset_code(
        &db,
        "a@x.com",
        &second,
        now + Duration::minutes(state.config.otp_ttl_minutes),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ExpiredCode));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn reset_removes_all_codes(db: PgPool) {
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::with_pool(db.clone(), mailer.clone());
    services::register(&db, &registration("a@x.com", "p1", &[]))
        .await
        .unwrap();
    services::issue_reset_code(&state, "a@x.com").await.unwrap();
    let code = last_code(&mailer);

    services::reset_password(&db, "A@x.com", "p2").await.unwrap();

    let left = VerificationCode::latest_unused_for_email(&db, "a@x.com")
        .await
        .unwrap();
    assert!(left.is_none());
    let err = services::verify_reset_code(&db, "a@x.com", &code, OffsetDateTime::now_utc())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidOrExpiredCode));

    let keys = JwtKeys::from(&state.config.jwt);
    services::login(&db, &keys, &login_req("a@x.com", "p2"))
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn undelivered_code_is_discarded(db: PgPool) {
    let mailer = Arc::new(RecordingMailer {
        fail: true,
        ..Default::default()
    });
    let state = AppState::with_pool(db.clone(), mailer);
    services::register(&db, &registration("a@x.com", "p1", &[]))
        .await
        .unwrap();

    let err = services::issue_reset_code(&state, "a@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DeliveryFailed));
    assert!(VerificationCode::latest_unused_for_email(&db, "a@x.com")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn unknown_email_gets_no_code(db: PgPool) {
    let state = AppState::with_pool(db, Arc::new(RecordingMailer::default()));
    let err = services::issue_reset_code(&state, "ghost@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));
}
