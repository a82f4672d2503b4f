//! Route table

use std::path::Path;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::services::{ServeDir, ServeFile};

use crate::AppState;

pub mod auth;
pub mod chat;
pub mod health;
pub mod projects;
pub mod social;

/// Pages served from the public directory, by route
const PAGES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/index", "index.html"),
    ("/login", "login.html"),
    ("/signin", "signin.html"),
    ("/followedProjects", "followedProjects.html"),
    ("/myProjects", "myProjects.html"),
];

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let public_dir = state.config.server.public_dir.clone();

    let api = Router::new()
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/whoami", get(auth::whoami))
        .route("/api/projects", get(projects::feed).post(projects::create))
        .route(
            "/api/projects/:id",
            get(projects::show)
                .put(projects::update)
                .delete(projects::remove),
        )
        .route("/api/projects/:id/like", post(social::like))
        .route("/api/projects/:id/follow", post(social::follow))
        .route("/api/projects/:id/dislike", post(social::dislike))
        .route("/api/projects/:id/followers", get(social::followers))
        .route(
            "/api/projects/:id/comments",
            get(social::comments).post(social::add_comment),
        )
        .route("/api/my-projects", get(projects::mine))
        .route("/api/followed-projects", get(projects::followed))
        .route("/api/chat", get(chat::history).post(chat::post))
        .route("/healthz", get(health::healthz));

    pages(api, &public_dir)
        .fallback_service(ServeDir::new(&public_dir))
        .layer(middleware::from_fn(crate::middleware::request_tracing))
        .with_state(state)
}

fn pages(router: Router<AppState>, public_dir: &Path) -> Router<AppState> {
    PAGES.iter().fold(router, |router, (route, file)| {
        router.route_service(route, ServeFile::new(public_dir.join(file)))
    })
}
