use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{parse_project_id, CreateProjectRequest, ProjectResponse},
    repo,
};
use crate::{
    auth::{dto::MessageResponse, jwt::AuthUser},
    error::AppError,
    state::AppState,
};

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me/projects", get(list_my_projects).post(create_project))
        .route("/users/me/projects/:id", delete(delete_project))
}

#[instrument(skip(state))]
pub async fn list_my_projects(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let rows = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(ProjectResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }

    let row = repo::create(&state.db, user_id, title, &payload.desc, &payload.images).await?;
    info!(user_id, project_id = row.id, "project created");
    Ok((StatusCode::CREATED, Json(ProjectResponse::from(row))))
}

#[instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let project_id = parse_project_id(&raw_id)?;

    if !repo::delete_owned(&state.db, user_id, project_id).await? {
        warn!(user_id, project_id, "project not found or not owned");
        return Err(AppError::NotFound("Project"));
    }

    info!(user_id, project_id, "project deleted");
    Ok(Json(MessageResponse { message: "Deleted" }))
}
