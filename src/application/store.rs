//! Post store: canonical post list plus load status.
//!
//! The store is an explicit state container. It is constructed once at startup and
//! shared by `Arc` with every component that reads or reloads posts. State lives in a
//! [`watch`] channel so readers observe each transition; every mutation happens inside a
//! single `send_modify`/`send_if_modified` closure, which keeps "check the ticket, then
//! apply" atomic.
//!
//! Loads are tagged with a monotonically increasing [`LoadTicket`]. A response is applied
//! only if it is newer than the last applied one and no newer load from a live owner is
//! still pending; anything else is discarded. A load is also scoped to its owner's
//! [`CancellationToken`]: once the owner is cancelled its response is dropped, and when no
//! live load remains the status falls back to the last settled one.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use serde::Deserialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::repos::{PostsProvider, ProviderError};
use crate::domain::error::DomainError;
use crate::domain::posts::Post;
use crate::domain::types::LoadStatus;

pub const METRIC_LOAD_STARTED: &str = "quire_store_load_started_total";
pub const METRIC_LOAD_APPLIED: &str = "quire_store_load_applied_total";
pub const METRIC_LOAD_DISCARDED: &str = "quire_store_load_discarded_total";
pub const METRIC_LOAD_MS: &str = "quire_store_load_ms";

const FALLBACK_ERROR: &str = "failed to load posts";

/// Sequence number of a store load. Zero means no load was ever issued.
pub type LoadTicket = u64;

/// Whether entering a view reloads posts that are already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefetchPolicy {
    /// Reload on every view entry.
    #[default]
    Always,
    /// Load until one attempt succeeds, then keep the list.
    Once,
}

impl fmt::Display for RefetchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefetchPolicy::Always => f.write_str("always"),
            RefetchPolicy::Once => f.write_str("once"),
        }
    }
}

impl FromStr for RefetchPolicy {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(RefetchPolicy::Always),
            "once" => Ok(RefetchPolicy::Once),
            other => Err(DomainError::validation(format!(
                "unknown refetch policy `{other}` (expected always or once)"
            ))),
        }
    }
}

/// Point-in-time view of the store.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    /// Provider order, exactly as last applied.
    pub posts: Arc<[Post]>,
    pub status: LoadStatus,
    /// Present only while `status` is [`LoadStatus::Failed`].
    pub error: Option<String>,
    /// Latest ticket handed out.
    pub issued: LoadTicket,
    /// Ticket whose response produced the current list and settled status, if any.
    pub applied: Option<LoadTicket>,
    settled: Settled,
    /// Loads still waiting for a response, with the scope of whoever issued them.
    pending: BTreeMap<LoadTicket, CancellationToken>,
}

/// Status and error of the last applied response.
#[derive(Debug, Clone, Default)]
struct Settled {
    status: LoadStatus,
    error: Option<String>,
}

impl StoreSnapshot {
    /// Newest pending load whose owner has not gone away.
    pub fn newest_live_load(&self) -> Option<LoadTicket> {
        self.pending
            .iter()
            .rev()
            .find(|(_, owner)| !owner.is_cancelled())
            .map(|(ticket, _)| *ticket)
    }

    /// Drop back to the settled status once nobody is waiting on a pending load.
    fn settle_if_abandoned(&mut self) -> bool {
        if self.status != LoadStatus::Loading || self.newest_live_load().is_some() {
            return false;
        }
        self.status = self.settled.status;
        self.error.clone_from(&self.settled.error);
        true
    }
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            posts: Arc::from(Vec::new()),
            status: LoadStatus::Idle,
            error: None,
            issued: 0,
            applied: None,
            settled: Settled::default(),
            pending: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Succeeded { count: usize },
    Failed { message: String },
    /// A newer response was already applied, or a newer live load is still pending.
    Superseded {
        ticket: LoadTicket,
        latest: LoadTicket,
    },
    /// The owner went away before the response could be applied.
    Cancelled,
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            LoadOutcome::Succeeded { .. } | LoadOutcome::Failed { .. }
        )
    }
}

/// A load running in the background.
#[derive(Debug)]
pub struct LoadHandle {
    ticket: LoadTicket,
    task: JoinHandle<LoadOutcome>,
}

impl LoadHandle {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Wait for the load to settle.
    pub async fn outcome(self) -> LoadOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(ticket = self.ticket, error = %err, "post load task did not complete");
                LoadOutcome::Cancelled
            }
        }
    }
}

pub struct PostStore {
    provider: Arc<dyn PostsProvider>,
    policy: RefetchPolicy,
    state: watch::Sender<StoreSnapshot>,
}

impl PostStore {
    pub fn new(provider: Arc<dyn PostsProvider>, policy: RefetchPolicy) -> Self {
        let (state, _) = watch::channel(StoreSnapshot::default());
        Self {
            provider,
            policy,
            state,
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.state.borrow().status
    }

    pub fn posts(&self) -> Arc<[Post]> {
        Arc::clone(&self.state.borrow().posts)
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    /// View-entry hook: trigger a load unless the refetch policy says the list is current.
    ///
    /// Under [`RefetchPolicy::Once`] a load is skipped while the last applied response was
    /// a success, or while a load from a live owner is already pending.
    pub fn enter(self: &Arc<Self>, owner: &CancellationToken) -> Option<LoadHandle> {
        let (settled, live) = {
            let state = self.state.borrow();
            (state.settled.status, state.newest_live_load())
        };
        let wanted = match self.policy {
            RefetchPolicy::Always => true,
            RefetchPolicy::Once => settled != LoadStatus::Succeeded && live.is_none(),
        };

        if !wanted {
            debug!(
                policy = %self.policy,
                settled = %settled,
                pending = ?live,
                "post load skipped on view entry"
            );
            return None;
        }

        Some(self.trigger_load(owner))
    }

    /// Mark the store as loading and fetch in the background.
    ///
    /// The status flips to `loading` before this returns. Each call issues its own
    /// provider request; overlapping calls are not merged.
    pub fn trigger_load(self: &Arc<Self>, owner: &CancellationToken) -> LoadHandle {
        let ticket = self.begin(owner);
        let store = Arc::clone(self);
        let owner = owner.clone();
        let task = tokio::spawn(async move { store.fetch_and_apply(ticket, &owner).await });
        LoadHandle { ticket, task }
    }

    /// Like [`PostStore::trigger_load`], awaited in place.
    pub async fn load(&self, owner: &CancellationToken) -> LoadOutcome {
        let ticket = self.begin(owner);
        self.fetch_and_apply(ticket, owner).await
    }

    fn begin(&self, owner: &CancellationToken) -> LoadTicket {
        let mut ticket = 0;
        self.state.send_modify(|state| {
            state.issued += 1;
            ticket = state.issued;
            state.pending.insert(ticket, owner.clone());
            state.status = LoadStatus::Loading;
            state.error = None;
        });

        counter!(METRIC_LOAD_STARTED).increment(1);
        info!(ticket, "post load issued");
        ticket
    }

    async fn fetch_and_apply(&self, ticket: LoadTicket, owner: &CancellationToken) -> LoadOutcome {
        let started_at = Instant::now();

        let result = tokio::select! {
            biased;
            _ = owner.cancelled() => None,
            result = self.provider.fetch_all_posts() => Some(result),
        };

        histogram!(METRIC_LOAD_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);

        let result = match result {
            Some(result) if !owner.is_cancelled() => result,
            _ => {
                self.abandon(ticket);
                counter!(METRIC_LOAD_DISCARDED, "reason" => "cancelled").increment(1);
                debug!(ticket, "post load owner cancelled; response dropped");
                return LoadOutcome::Cancelled;
            }
        };

        self.apply(ticket, result)
    }

    fn abandon(&self, ticket: LoadTicket) {
        self.state.send_if_modified(|state| {
            state.pending.remove(&ticket);
            state.settle_if_abandoned()
        });
    }

    fn apply(&self, ticket: LoadTicket, result: Result<Vec<Post>, ProviderError>) -> LoadOutcome {
        let mut outcome = LoadOutcome::Cancelled;

        self.state.send_if_modified(|state| {
            state.pending.remove(&ticket);

            let newer_live = state.newest_live_load().filter(|latest| *latest > ticket);
            let newer_applied = state.applied.filter(|applied| *applied > ticket);
            if let Some(latest) = newer_live.or(newer_applied) {
                outcome = LoadOutcome::Superseded { ticket, latest };
                return state.settle_if_abandoned();
            }

            state.applied = Some(ticket);
            match result {
                Ok(posts) => {
                    outcome = LoadOutcome::Succeeded { count: posts.len() };
                    state.posts = posts.into();
                    state.status = LoadStatus::Succeeded;
                    state.error = None;
                }
                Err(err) => {
                    let mut message = err.to_string();
                    if message.trim().is_empty() {
                        message = FALLBACK_ERROR.to_string();
                    }
                    outcome = LoadOutcome::Failed {
                        message: message.clone(),
                    };
                    state.status = LoadStatus::Failed;
                    state.error = Some(message);
                }
            }
            state.settled = Settled {
                status: state.status,
                error: state.error.clone(),
            };
            true
        });

        match &outcome {
            LoadOutcome::Succeeded { count } => {
                counter!(METRIC_LOAD_APPLIED, "outcome" => "succeeded").increment(1);
                info!(ticket, count, "post load applied");
            }
            LoadOutcome::Failed { message } => {
                counter!(METRIC_LOAD_APPLIED, "outcome" => "failed").increment(1);
                warn!(ticket, error = %message, "post load failed");
            }
            LoadOutcome::Superseded { latest, .. } => {
                counter!(METRIC_LOAD_DISCARDED, "reason" => "superseded").increment(1);
                debug!(ticket, latest, "stale post load discarded");
            }
            LoadOutcome::Cancelled => {}
        }

        outcome
    }
}
