use rand::{rngs::OsRng, Rng};
use time::OffsetDateTime;

use crate::{auth::repo_types::VerificationCode, error::AppError};

pub const OTP_DIGITS: usize = 4;

/// Zero-padded 4-digit code drawn from the OS CSPRNG.
pub fn generate_otp() -> String {
    format!("{:0width$}", OsRng.gen_range(0..10_000u32), width = OTP_DIGITS)
}

/// Checks a candidate against the stored code: value first, then expiry.
/// A code is valid strictly before `expires_at`.
pub fn check_code(
    stored: &VerificationCode,
    candidate: &str,
    now: OffsetDateTime,
) -> Result<(), AppError> {
    if stored.code != candidate {
        return Err(AppError::InvalidCode);
    }
    if now >= stored.expires_at {
        return Err(AppError::ExpiredCode);
    }
    Ok(())
}
