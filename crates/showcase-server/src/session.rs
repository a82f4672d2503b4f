//! Cookie-backed login sessions
//!
//! The cookie carries only the opaque session token; everything else lives
//! in the `sessions` table and is resolved per request by [`CurrentUser`].

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use showcase_core::commands::SessionRepository;
use showcase_core::config::SessionConfig;

use crate::error::ApiError;
use crate::AppState;

/// The logged-in user behind a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers, &state.config.session.cookie_name)
            .ok_or(ApiError::Unauthorized)?;

        let session = SessionRepository::new(&state.db)
            .resolve(&token)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        tracing::Span::current().record("user_id", session.user_id);
        Ok(Self {
            id: session.user_id,
            username: session.username,
            token: session.token,
        })
    }
}

/// Find the session token among the request cookies
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value opening a session
pub fn session_cookie(config: &SessionConfig, token: &str) -> String {
    let max_age = config.ttl_hours.saturating_mul(3600);
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        config.cookie_name, token, max_age
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value removing the session cookie
pub fn clear_cookie(config: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        config.cookie_name
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; showcase_session=abc-123; lang=fr"),
        );

        assert_eq!(
            session_token(&headers, "showcase_session").as_deref(),
            Some("abc-123")
        );
        assert_eq!(session_token(&headers, "other"), None);
    }

    #[test]
    fn test_session_token_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("showcase_session=xyz"));

        assert_eq!(session_token(&headers, "showcase_session").as_deref(), Some("xyz"));
    }

    #[test]
    fn test_empty_session_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("showcase_session="));
        assert_eq!(session_token(&headers, "showcase_session"), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let mut config = SessionConfig::default();
        let cookie = session_cookie(&config, "tok");
        assert!(cookie.starts_with("showcase_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));

        config.secure_cookie = true;
        assert!(session_cookie(&config, "tok").ends_with("; Secure"));
        assert!(clear_cookie(&config).contains("Max-Age=0"));
    }

    #[test]
    fn test_cookie_max_age_saturates() {
        let config = SessionConfig {
            ttl_hours: i64::MAX,
            ..SessionConfig::default()
        };
        let cookie = session_cookie(&config, "tok");
        assert!(cookie.contains(&format!("Max-Age={}", i64::MAX)));
    }
}
