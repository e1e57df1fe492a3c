use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Credential columns of a user row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,               // stored trimmed and lowercased
    #[serde(skip_serializing)]
    pub password_hash: String,       // Argon2 PHC string, not exposed in JSON
    pub created_at: OffsetDateTime,
}

/// The part of a reset code row a candidate is checked against.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationCode {
    pub code: String,
    pub expires_at: OffsetDateTime,
}
