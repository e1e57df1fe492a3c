use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use tracing::{error, info, instrument};

use super::{
    dto::{
        validate_gpa, ProfileResponse, UpdateProfileRequest, VisibilityRequest,
        VisibilityResponse,
    },
    repo,
};
use crate::{
    auth::{dto::MessageResponse, jwt::AuthUser},
    error::AppError,
    skills,
    state::AppState,
};

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me).put(update_me).delete(delete_me))
        .route("/users/me/skills", get(get_my_skills))
        .route("/users/me/dashboard-visibility", put(set_dashboard_visibility))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    // The row can vanish between token issue and this lookup.
    let Some(row) = repo::find_profile(&state.db, user_id).await? else {
        error!(user_id, "authenticated user not found");
        return Err(AppError::UserNotFound);
    };
    let skills = skills::list_for_user(&state.db, user_id).await?;

    Ok(Json(ProfileResponse {
        user_id: row.id,
        email: row.email,
        user_name: row.user_name,
        phone: row.phone,
        university: row.university,
        faculty: row.faculty,
        major: row.major,
        gpa: row.gpa,
        job_interest: row.job_interest,
        profile_image_url: row.profile_image_url,
        show_on_dashboard: row.show_on_dashboard,
        skills,
    }))
}

#[instrument(skip(state))]
pub async fn get_my_skills(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(skills::list_for_user(&state.db, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_gpa(payload.gpa)?;

    if !repo::update_profile(&state.db, user_id, &payload).await? {
        return Err(AppError::UserNotFound);
    }

    info!(user_id, "profile updated");
    Ok(Json(MessageResponse {
        message: "Profile updated successfully",
    }))
}

#[instrument(skip(state))]
pub async fn delete_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    if !repo::delete_user(&state.db, user_id).await? {
        return Err(AppError::UserNotFound);
    }

    info!(user_id, "account deleted");
    Ok(Json(MessageResponse {
        message: "Account deleted successfully",
    }))
}

#[instrument(skip(state, payload))]
pub async fn set_dashboard_visibility(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<VisibilityRequest>,
) -> Result<Json<VisibilityResponse>, AppError> {
    if !repo::set_visibility(&state.db, user_id, payload.show_on_dashboard).await? {
        return Err(AppError::UserNotFound);
    }

    Ok(Json(VisibilityResponse {
        message: "Dashboard visibility updated",
        show_on_dashboard: payload.show_on_dashboard,
    }))
}
