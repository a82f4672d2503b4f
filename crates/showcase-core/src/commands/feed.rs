//! Front page assembly

use super::project::{Project, ProjectRepository};
use crate::feed::FeedSelector;
use crate::storage::Database;
use crate::Result;

/// Load every project and return the page chosen by `selector` for `seed`
pub async fn front_page(db: &Database, selector: &FeedSelector, seed: i64) -> Result<Vec<Project>> {
    let projects = ProjectRepository::new(db).list_all().await?;
    let page = selector.select(&projects, seed);

    tracing::debug!(
        seed,
        total = projects.len(),
        returned = page.len(),
        strategy = selector.strategy().as_str(),
        "Feed selected"
    );
    Ok(page)
}
