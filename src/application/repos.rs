//! Provider trait describing where posts come from.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::posts::{Post, PostId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Post not found")]
    NotFound { id: PostId },
    #[error("{message}")]
    Unavailable { message: String },
}

impl ProviderError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Asynchronous source of posts.
///
/// Implementations stand in for the network boundary; a real deployment would back
/// them with HTTP calls mapping 4xx to [`ProviderError::NotFound`] and 5xx to
/// [`ProviderError::Unavailable`].
#[async_trait]
pub trait PostsProvider: Send + Sync {
    /// Every post, in provider order.
    async fn fetch_all_posts(&self) -> Result<Vec<Post>, ProviderError>;

    async fn fetch_post_by_id(&self, id: PostId) -> Result<Post, ProviderError>;
}
