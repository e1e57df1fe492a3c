use serde::Serialize;
use sqlx::FromRow;

use crate::projects::dto::ProjectResponse;

/// Listing entry for a user who opted into the dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileCard {
    pub user_id: i64,
    pub user_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub job_interest: Option<String>,
    pub university: Option<String>,
    pub faculty: Option<String>,
    pub major: Option<String>,
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PublicProfileRow {
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
}

#[derive(Debug, Serialize)]
pub struct PublicProfileResponse {
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
    pub skills: Vec<String>,
    pub projects: Vec<ProjectResponse>,
}

impl PublicProfileResponse {
    pub fn new(row: PublicProfileRow, skills: Vec<String>, projects: Vec<ProjectResponse>) -> Self {
        Self {
            user_id: row.user_id,
            email: row.email,
            user_name: row.user_name,
            phone: row.phone,
            university: row.university,
            faculty: row.faculty,
            major: row.major,
            gpa: row.gpa,
            job_interest: row.job_interest,
            profile_image_url: row.profile_image_url,
            skills,
            projects,
        }
    }
}
