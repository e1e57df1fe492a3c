use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{ProfileCard, PublicProfileResponse},
    repo,
};
use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    projects::{self, dto::ProjectResponse},
    skills,
    state::AppState,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/profiles", get(list_profiles))
        .route("/dashboard/public-profiles", get(list_public_profiles))
        .route("/dashboard/profiles/:id", get(get_public_profile))
}

#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ProfileCard>>, AppError> {
    Ok(Json(repo::list_visible(&state.db, Some(user_id)).await?))
}

#[instrument(skip(state))]
pub async fn list_public_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileCard>>, AppError> {
    Ok(Json(repo::list_visible(&state.db, None).await?))
}

#[instrument(skip(state))]
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<PublicProfileResponse>, AppError> {
    let user_id: i64 = raw_id
        .trim()
        .parse()
        .map_err(|_| AppError::validation("Invalid user id"))?;

    // Hidden and missing profiles answer the same way.
    let row = repo::find_visible(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("Profile"))?;

    let skills = skills::list_for_user(&state.db, user_id).await?;
    let projects = projects::repo::list_by_user(&state.db, user_id)
        .await?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();

    Ok(Json(PublicProfileResponse::new(row, skills, projects)))
}
