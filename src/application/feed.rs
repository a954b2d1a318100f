//! Home feed session: store + debounced search + sort order for one view entry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::debounce::Debouncer;
use crate::application::pipeline::{PostQuery, derive};
use crate::application::store::{LoadHandle, LoadOutcome, PostStore, StoreSnapshot};
use crate::domain::posts::Post;
use crate::domain::types::{LoadStatus, SortOrder};

/// What the home page should show right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    Loading,
    Failed { message: String },
    Ready { posts: Vec<Post>, query: PostQuery },
}

impl FeedView {
    pub fn posts(&self) -> &[Post] {
        match self {
            FeedView::Ready { posts, .. } => posts,
            _ => &[],
        }
    }

    /// Loaded, but the search matched nothing.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, FeedView::Ready { posts, .. } if posts.is_empty())
    }
}

pub struct FeedSession {
    store: Arc<PostStore>,
    scope: CancellationToken,
    search: Debouncer<String>,
    search_input: String,
    sort: watch::Sender<SortOrder>,
    store_rx: watch::Receiver<StoreSnapshot>,
    search_rx: watch::Receiver<String>,
    sort_rx: watch::Receiver<SortOrder>,
    load: Option<LoadHandle>,
}

impl FeedSession {
    /// Enter the home view. Search and sort start from their defaults; the store is asked
    /// to load according to its refetch policy.
    pub fn open(store: Arc<PostStore>, parent: &CancellationToken, debounce: Duration) -> Self {
        let scope = parent.child_token();
        let search = Debouncer::new(String::new(), debounce);
        let (sort, sort_rx) = watch::channel(SortOrder::default());
        let store_rx = store.subscribe();
        let search_rx = search.subscribe();
        let load = store.enter(&scope);

        Self {
            store,
            scope,
            search,
            search_input: String::new(),
            sort,
            store_rx,
            search_rx,
            sort_rx,
            load,
        }
    }

    /// Raw text as typed, before debouncing.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.search_input.clone_from(&text);
        self.search.push(text);
    }

    /// Whether typed search text is still waiting out the quiet period.
    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    pub fn set_sort(&self, order: SortOrder) {
        self.sort.send_if_modified(|current| {
            if *current == order {
                return false;
            }
            *current = order;
            true
        });
    }

    pub fn query(&self) -> PostQuery {
        PostQuery::new(self.search.current(), *self.sort.borrow())
    }

    pub fn view(&self) -> FeedView {
        let snapshot = self.store.snapshot();
        if snapshot.status.is_pending() {
            return FeedView::Loading;
        }
        if snapshot.status == LoadStatus::Failed {
            return FeedView::Failed {
                message: snapshot.error.unwrap_or_default(),
            };
        }

        let query = self.query();
        let posts = derive(&snapshot.posts, &query)
            .into_iter()
            .cloned()
            .collect();
        FeedView::Ready { posts, query }
    }

    /// Re-trigger the list fetch regardless of the refetch policy.
    pub fn reload(&mut self) {
        self.load = Some(self.store.trigger_load(&self.scope));
    }

    /// Wait for the load started by this session, if one is outstanding.
    pub async fn settle(&mut self) -> Option<LoadOutcome> {
        let handle = self.load.take()?;
        Some(handle.outcome().await)
    }

    /// Resolve once any input of the derived list changes: the store, the settled search
    /// text or the sort order.
    pub async fn changed(&mut self) {
        tokio::select! {
            Ok(()) = self.store_rx.changed() => {}
            Ok(()) = self.search_rx.changed() => {}
            Ok(()) = self.sort_rx.changed() => {}
            else => std::future::pending::<()>().await,
        }
        self.store_rx.borrow_and_update();
        self.search_rx.borrow_and_update();
        self.sort_rx.borrow_and_update();
    }

    /// Leave the view. A load this session started no longer applies its response.
    pub fn close(self) {}
}

impl Drop for FeedSession {
    fn drop(&mut self) {
        debug!("feed session closed");
        self.scope.cancel();
    }
}
