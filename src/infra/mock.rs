//! In-process provider serving the seed lessons after artificial delays.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::debug;

use crate::application::repos::{PostsProvider, ProviderError};
use crate::config::ProviderSettings;
use crate::domain::posts::{Post, PostId, seed_posts};

pub const DEFAULT_LIST_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_DETAIL_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct MockPostsProvider {
    posts: Arc<[Post]>,
    list_delay: Duration,
    detail_delay: Duration,
}

impl MockPostsProvider {
    pub fn new(posts: Vec<Post>, list_delay: Duration, detail_delay: Duration) -> Self {
        Self {
            posts: posts.into(),
            list_delay,
            detail_delay,
        }
    }

    /// The built-in lessons with the configured delays.
    pub fn seeded(settings: &ProviderSettings) -> Self {
        Self::new(seed_posts(), settings.list_delay, settings.detail_delay)
    }
}

impl Default for MockPostsProvider {
    fn default() -> Self {
        Self::new(seed_posts(), DEFAULT_LIST_DELAY, DEFAULT_DETAIL_DELAY)
    }
}

#[async_trait]
impl PostsProvider for MockPostsProvider {
    async fn fetch_all_posts(&self) -> Result<Vec<Post>, ProviderError> {
        sleep(self.list_delay).await;
        debug!(count = self.posts.len(), "mock provider served post list");
        Ok(self.posts.to_vec())
    }

    async fn fetch_post_by_id(&self, id: PostId) -> Result<Post, ProviderError> {
        sleep(self.detail_delay).await;
        self.posts
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or(ProviderError::NotFound { id })
    }
}
