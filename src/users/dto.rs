use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const GPA_MIN: f64 = 0.0;
pub const GPA_MAX: f64 = 4.0;

pub fn validate_gpa(gpa: Option<f64>) -> Result<(), AppError> {
    match gpa {
        Some(g) if !(GPA_MIN..=GPA_MAX).contains(&g) => {
            Err(AppError::validation("GPA must be between 0.00 and 4.00"))
        }
        _ => Ok(()),
    }
}

/// Full replacement of the editable profile fields.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub faculty: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub job_interest: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// `None` keeps the current skills, `Some(vec![])` clears them.
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: i64,
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
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VisibilityRequest {
    pub show_on_dashboard: bool,
}

#[derive(Debug, Serialize)]
pub struct VisibilityResponse {
    pub message: &'static str,
    pub show_on_dashboard: bool,
}
