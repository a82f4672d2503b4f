//! Project feed and project CRUD

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use showcase_core::commands::{
    front_page, CommentRepository, FollowRepository, Project, ProjectRepository,
};
use showcase_core::feed::resolve_seed;

use crate::error::{parse_project_id, require_fields, ApiError};
use crate::session::CurrentUser;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub seed: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Front page: the shuffled, size-bounded view of all projects
pub async fn feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let selector = state.config.feed.selector();
    let seed = resolve_seed(query.seed.as_deref(), selector.strategy(), Utc::now());
    let page = front_page(&state.db, &selector, seed).await?;
    Ok(Json(page))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    require_fields(&[&body.title, &body.description], "Missing fields")?;

    let id = ProjectRepository::new(&state.db)
        .create(user.id, body.title.trim(), body.description.trim())
        .await?;

    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn show(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_project_id(&raw_id)?;

    let project = ProjectRepository::new(&state.db)
        .get(id)
        .await?
        .ok_or(ApiError::ProjectNotFound)?;
    let comments = CommentRepository::new(&state.db).list_by_project(id).await?;
    let likes_count = FollowRepository::new(&state.db).count(id).await?;

    Ok(Json(json!({
        "project": project,
        "comments": comments,
        "likesCount": likes_count,
    })))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_project_id(&raw_id)?;
    let Json(body) = payload?;
    require_fields(&[&body.title, &body.description], "Missing fields")?;

    let repo = ProjectRepository::new(&state.db);
    repo.ensure_owner(id, user.id).await?;
    repo.update(id, body.title.trim(), body.description.trim())
        .await?;

    tracing::info!(project_id = id, user_id = user.id, "Project updated");
    Ok(Json(json!({ "success": true })))
}

pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_project_id(&raw_id)?;

    let repo = ProjectRepository::new(&state.db);
    repo.ensure_owner(id, user.id).await?;
    repo.delete(id).await?;

    Ok(Json(json!({ "success": true })))
}

pub async fn mine(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = ProjectRepository::new(&state.db)
        .list_by_owner(user.id)
        .await?;
    Ok(Json(projects))
}

pub async fn followed(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = ProjectRepository::new(&state.db)
        .list_followed_by(user.id)
        .await?;
    Ok(Json(projects))
}
