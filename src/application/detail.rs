//! Single-post loading for the post page.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::application::repos::{PostsProvider, ProviderError};
use crate::domain::posts::{InvalidPostId, Post, PostBlock, PostId};

const NOT_FOUND_MESSAGE: &str = "Post not found";

#[derive(Debug, Error)]
pub enum DetailError {
    #[error(transparent)]
    InvalidId(#[from] InvalidPostId),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl DetailError {
    /// Text shown in place of the post. Unparseable ids read the same as unknown ones.
    pub fn public_message(&self) -> String {
        match self {
            DetailError::InvalidId(_) => NOT_FOUND_MESSAGE.to_string(),
            DetailError::Provider(ProviderError::NotFound { .. }) => NOT_FOUND_MESSAGE.to_string(),
            DetailError::Provider(err) => err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub post: Post,
    pub blocks: Vec<PostBlock>,
}

impl PostDetail {
    fn new(post: Post) -> Self {
        let blocks = post.blocks();
        Self { post, blocks }
    }

    /// Target of the "next lesson" link.
    pub fn next_post_id(&self) -> Option<PostId> {
        self.post.next_post_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Ready(Box<PostDetail>),
    Failed { message: String },
    Cancelled,
}

#[derive(Clone)]
pub struct PostDetailLoader {
    provider: Arc<dyn PostsProvider>,
    min_display: Duration,
}

impl PostDetailLoader {
    pub fn new(provider: Arc<dyn PostsProvider>, min_display: Duration) -> Self {
        Self {
            provider,
            min_display,
        }
    }

    /// Fetch a post by its route segment.
    ///
    /// Resolves no earlier than the minimum display time so a loading indicator never
    /// flashes. Returns [`DetailState::Cancelled`] if `owner` is cancelled first.
    pub async fn load(&self, raw_id: &str, owner: &CancellationToken) -> DetailState {
        match self.resolve(raw_id, owner).await {
            None => DetailState::Cancelled,
            Some(Ok(detail)) => DetailState::Ready(Box::new(detail)),
            Some(Err(err)) => DetailState::Failed {
                message: err.public_message(),
            },
        }
    }

    /// [`PostDetailLoader::load`] keeping the typed error. `None` means `owner` was
    /// cancelled before the post arrived.
    pub async fn resolve(
        &self,
        raw_id: &str,
        owner: &CancellationToken,
    ) -> Option<Result<PostDetail, DetailError>> {
        let result = tokio::select! {
            biased;
            _ = owner.cancelled() => None,
            result = self.fetch_with_floor(raw_id) => Some(result),
        };

        match result {
            Some(_) if owner.is_cancelled() => None,
            None => {
                debug!(raw_id, "post detail owner cancelled");
                None
            }
            Some(Ok(post)) => {
                info!(post_id = %post.id, "post detail loaded");
                Some(Ok(PostDetail::new(post)))
            }
            Some(Err(err)) => {
                info!(raw_id, error = %err, "post detail unavailable");
                Some(Err(err))
            }
        }
    }

    /// Fetch without the display floor or cancellation scope.
    pub async fn fetch(&self, raw_id: &str) -> Result<Post, DetailError> {
        let id: PostId = raw_id.parse()?;
        Ok(self.provider.fetch_post_by_id(id).await?)
    }

    async fn fetch_with_floor(&self, raw_id: &str) -> Result<Post, DetailError> {
        let (result, ()) = tokio::join!(self.fetch(raw_id), tokio::time::sleep(self.min_display));
        result
    }
}
