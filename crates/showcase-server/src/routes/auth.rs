//! Signup, login and logout

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use chrono::Duration;
use serde::Deserialize;
use serde_json::{json, Value};
use showcase_core::commands::{SessionRepository, UserRepository};

use crate::error::{require_fields, ApiError};
use crate::session::{clear_cookie, session_cookie, session_token, CurrentUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    require_fields(&[&body.username, &body.email, &body.password], "Missing fields")?;

    let id = UserRepository::new(&state.db)
        .create(body.username.trim(), body.email.trim(), &body.password)
        .await?;

    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;
    require_fields(&[&body.username, &body.password], "Missing fields")?;

    let user = UserRepository::new(&state.db)
        .verify_credentials(body.username.trim(), &body.password)
        .await?;

    let ttl = Duration::try_hours(state.config.session.ttl_hours).ok_or_else(|| {
        showcase_core::Error::Other("Session lifetime out of range".to_string())
    })?;
    let session = SessionRepository::new(&state.db)
        .create(user.id, &user.username, ttl)
        .await?;

    tracing::info!(user_id = user.id, "User logged in");
    let cookie = session_cookie(&state.config.session, &session.token);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({ "success": true })),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(token) = session_token(&headers, &state.config.session.cookie_name) {
        SessionRepository::new(&state.db).delete(&token).await?;
    }

    let cookie = clear_cookie(&state.config.session);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({ "success": true })),
    )
        .into_response())
}

pub async fn whoami(user: CurrentUser) -> Json<Value> {
    Json(json!({ "id": user.id, "username": user.username }))
}
