//! Follows and comments

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use showcase_core::commands::{Comment, CommentRepository, FollowRepository, Follower};

use crate::error::{parse_project_id, require_fields, ApiError};
use crate::session::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub content: String,
}

/// Toggle the follow relation
pub async fn like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_project_id(&raw_id)?;
    let liked = FollowRepository::new(&state.db).toggle(user.id, id).await?;
    Ok(Json(json!({ "liked": liked })))
}

pub async fn follow(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_project_id(&raw_id)?;
    let followed = FollowRepository::new(&state.db).follow(user.id, id).await?;

    if followed {
        Ok(Json(json!({ "followed": true })))
    } else {
        Ok(Json(json!({ "followed": false, "message": "Already following" })))
    }
}

pub async fn dislike(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_project_id(&raw_id)?;
    let disliked = FollowRepository::new(&state.db).unfollow(user.id, id).await?;
    Ok(Json(json!({ "disliked": disliked })))
}

pub async fn followers(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<Follower>>, ApiError> {
    let id = parse_project_id(&raw_id)?;
    let followers = FollowRepository::new(&state.db).followers(id).await?;
    Ok(Json(followers))
}

pub async fn comments(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let id = parse_project_id(&raw_id)?;
    let comments = CommentRepository::new(&state.db).list_by_project(id).await?;
    Ok(Json(comments))
}

pub async fn add_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_project_id(&raw_id)?;
    let Json(body) = payload?;
    require_fields(&[&body.content], "Invalid input")?;

    CommentRepository::new(&state.db)
        .create(id, user.id, body.content.trim())
        .await?;

    Ok(Json(json!({ "success": true })))
}
