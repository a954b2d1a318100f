//! End-to-end flows over the mock provider with a paused clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use quire::application::detail::{DetailState, PostDetailLoader};
use quire::application::feed::{FeedSession, FeedView};
use quire::application::repos::{PostsProvider, ProviderError};
use quire::application::store::{LoadOutcome, PostStore, RefetchPolicy};
use quire::domain::posts::{Post, PostId, reading_order, seed_posts};
use quire::domain::types::{LoadStatus, SortOrder};
use quire::infra::mock::MockPostsProvider;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

const DEBOUNCE: Duration = Duration::from_millis(300);

fn three_posts() -> Vec<Post> {
    vec![
        Post::new(1, "Getting Started with React", "", "", Some(2)),
        Post::new(2, "Understanding Hooks", "", "", Some(3)),
        Post::new(3, "React Router for Navigation", "", "", None),
    ]
}

fn store_over(posts: Vec<Post>, policy: RefetchPolicy) -> Arc<PostStore> {
    let provider = MockPostsProvider::new(
        posts,
        Duration::from_millis(1000),
        Duration::from_millis(500),
    );
    Arc::new(PostStore::new(Arc::new(provider), policy))
}

fn ids(view: &FeedView) -> Vec<u32> {
    view.posts().iter().map(|post| post.id.get()).collect()
}

#[tokio::test(start_paused = true)]
async fn search_and_sort_follow_the_debounced_input() {
    let store = store_over(three_posts(), RefetchPolicy::Always);
    let root = CancellationToken::new();
    let mut session = FeedSession::open(store, &root, DEBOUNCE);

    assert_eq!(session.view(), FeedView::Loading);
    assert_eq!(
        session.settle().await,
        Some(LoadOutcome::Succeeded { count: 3 })
    );
    assert_eq!(ids(&session.view()), vec![1, 2, 3]);

    session.set_search("react");
    assert_eq!(session.search_input(), "react");
    assert_eq!(ids(&session.view()), vec![1, 2, 3]);

    sleep(DEBOUNCE + Duration::from_millis(50)).await;
    assert_eq!(ids(&session.view()), vec![1, 3]);

    session.set_sort(SortOrder::Ascending);
    let titles: Vec<String> = session
        .view()
        .posts()
        .iter()
        .map(|post| post.title.clone())
        .collect();
    assert_eq!(
        titles,
        vec!["Getting Started with React", "React Router for Navigation"]
    );

    session.set_sort(SortOrder::Descending);
    assert_eq!(ids(&session.view()), vec![3, 1]);
}

#[tokio::test(start_paused = true)]
async fn unmatched_search_is_an_empty_result() {
    let store = store_over(seed_posts(), RefetchPolicy::Always);
    let root = CancellationToken::new();
    let mut session = FeedSession::open(store, &root, Duration::ZERO);
    session.settle().await;

    session.set_search("zzz-nothing");
    let view = session.view();
    assert!(view.is_empty_result());

    session.clear_search();
    assert_eq!(session.view().posts().len(), 8);
}

#[tokio::test(start_paused = true)]
async fn closing_the_session_mid_load_drops_its_response() {
    let store = store_over(three_posts(), RefetchPolicy::Always);
    let root = CancellationToken::new();
    let session = FeedSession::open(Arc::clone(&store), &root, DEBOUNCE);

    assert_eq!(store.status(), LoadStatus::Loading);
    sleep(Duration::from_millis(200)).await;
    session.close();

    sleep(Duration::from_millis(1500)).await;
    let snapshot = store.snapshot();
    assert!(snapshot.posts.is_empty());
    assert_eq!(snapshot.applied, None);
    assert_eq!(snapshot.status, LoadStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn reopening_after_an_abandoned_load_fetches_again_under_once() {
    let store = store_over(three_posts(), RefetchPolicy::Once);
    let root = CancellationToken::new();

    let first = FeedSession::open(Arc::clone(&store), &root, DEBOUNCE);
    sleep(Duration::from_millis(400)).await;
    first.close();
    sleep(Duration::from_millis(1000)).await;
    assert_eq!(store.status(), LoadStatus::Idle);

    let mut second = FeedSession::open(Arc::clone(&store), &root, DEBOUNCE);
    assert_eq!(second.view(), FeedView::Loading);
    assert_eq!(
        second.settle().await,
        Some(LoadOutcome::Succeeded { count: 3 })
    );
    assert_eq!(ids(&second.view()), vec![1, 2, 3]);
    assert_eq!(store.snapshot().issued, 2);
}

#[tokio::test(start_paused = true)]
async fn refetch_once_reuses_the_loaded_list() {
    let store = store_over(seed_posts(), RefetchPolicy::Once);
    let root = CancellationToken::new();

    let mut first = FeedSession::open(Arc::clone(&store), &root, DEBOUNCE);
    assert!(matches!(
        first.settle().await,
        Some(LoadOutcome::Succeeded { count: 8 })
    ));
    first.close();

    let mut second = FeedSession::open(Arc::clone(&store), &root, DEBOUNCE);
    assert_eq!(second.settle().await, None);
    assert_eq!(second.view().posts().len(), 8);
    assert_eq!(store.snapshot().issued, 1);
}

#[tokio::test(start_paused = true)]
async fn always_refetches_on_every_entry() {
    let store = store_over(seed_posts(), RefetchPolicy::Always);
    let root = CancellationToken::new();

    let mut first = FeedSession::open(Arc::clone(&store), &root, DEBOUNCE);
    first.settle().await;
    first.close();

    let second = FeedSession::open(Arc::clone(&store), &root, DEBOUNCE);
    assert_eq!(store.status(), LoadStatus::Loading);
    assert_eq!(store.posts().len(), 8);
    drop(second);
}

/// First call is slow, every later call is fast.
struct SlowThenFast {
    calls: AtomicUsize,
}

#[async_trait]
impl PostsProvider for SlowThenFast {
    async fn fetch_all_posts(&self) -> Result<Vec<Post>, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            sleep(Duration::from_millis(1000)).await;
            Ok(vec![Post::new(1, "stale", "", "", None)])
        } else {
            sleep(Duration::from_millis(100)).await;
            Ok(vec![Post::new(2, "fresh", "", "", None)])
        }
    }

    async fn fetch_post_by_id(&self, id: PostId) -> Result<Post, ProviderError> {
        Err(ProviderError::NotFound { id })
    }
}

#[tokio::test(start_paused = true)]
async fn slower_earlier_response_never_overwrites_newer_one() {
    let provider = SlowThenFast {
        calls: AtomicUsize::new(0),
    };
    let store = Arc::new(PostStore::new(Arc::new(provider), RefetchPolicy::Always));
    let owner = CancellationToken::new();

    let older = store.trigger_load(&owner);
    let newer = store.trigger_load(&owner);
    let (older_ticket, newer_ticket) = (older.ticket(), newer.ticket());

    assert_eq!(newer.outcome().await, LoadOutcome::Succeeded { count: 1 });
    assert_eq!(
        older.outcome().await,
        LoadOutcome::Superseded {
            ticket: older_ticket,
            latest: newer_ticket,
        }
    );

    let snapshot = store.snapshot();
    assert_eq!(snapshot.posts[0].title, "fresh");
    assert_eq!(snapshot.status, LoadStatus::Succeeded);
    assert_eq!(snapshot.applied, Some(newer_ticket));
}

#[tokio::test(start_paused = true)]
async fn detail_for_unknown_or_malformed_id_reads_not_found() {
    let provider: Arc<dyn PostsProvider> = Arc::new(MockPostsProvider::default());
    let loader = PostDetailLoader::new(provider, Duration::from_millis(500));
    let owner = CancellationToken::new();

    for raw in ["99", "abc"] {
        assert_eq!(
            loader.load(raw, &owner).await,
            DetailState::Failed {
                message: "Post not found".to_string()
            }
        );
    }
}

#[tokio::test(start_paused = true)]
async fn detail_waits_for_minimum_display_and_links_next_lesson() {
    let provider: Arc<dyn PostsProvider> = Arc::new(MockPostsProvider::new(
        seed_posts(),
        Duration::from_millis(1000),
        Duration::from_millis(50),
    ));
    let loader = PostDetailLoader::new(provider, Duration::from_millis(500));
    let owner = CancellationToken::new();
    let started = Instant::now();

    let state = loader.load(" 3 ", &owner).await;

    assert!(started.elapsed() >= Duration::from_millis(500));
    match state {
        DetailState::Ready(detail) => {
            assert_eq!(detail.post.title, "React Router for Navigation");
            assert_eq!(detail.next_post_id(), Some(PostId::new(4)));
            assert!(!detail.blocks.is_empty());
        }
        other => panic!("expected ready detail, got {other:?}"),
    }
}

#[test]
fn seed_lessons_form_a_single_chain() {
    let posts = seed_posts();
    let order: Vec<u32> = reading_order(&posts)
        .expect("seed chain is valid")
        .into_iter()
        .map(|post| post.id.get())
        .collect();
    assert_eq!(order, (1..=8).collect::<Vec<_>>());
}
