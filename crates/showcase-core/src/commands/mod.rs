//! Domain entities and their repositories
//!
//! Each submodule owns one table family: the entity type, a repository over
//! [`crate::storage::Database`] and the tests for both.

pub mod chat;
pub mod comment;
pub mod feed;
pub mod follow;
pub mod project;
pub mod session;
pub mod user;

pub use chat::{ChatMessage, ChatRepository};
pub use comment::{Comment, CommentRepository};
pub use feed::front_page;
pub use follow::{Follower, FollowRepository};
pub use project::{Project, ProjectRepository};
pub use session::{Session, SessionRepository};
pub use user::{User, UserRepository};
