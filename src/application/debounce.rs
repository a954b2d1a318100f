//! Quiet-period gate for rapidly changing input.
//!
//! A [`Debouncer`] republishes an input value only once the input has stayed unchanged
//! for the configured delay. Each [`Debouncer::push`] cancels the pending update and
//! schedules a fresh one, so a burst of pushes yields a single output: the last value.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::trace;

use crate::util::lock::mutex_lock;

const SOURCE: &str = "application::debounce";

struct Pending {
    /// Bumped on every push; a scheduled update only lands if it still holds the latest value.
    generation: u64,
    task: Option<JoinHandle<()>>,
}

pub struct Debouncer<T> {
    delay: Duration,
    output: Arc<watch::Sender<T>>,
    pending: Arc<Mutex<Pending>>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a debouncer whose output starts at `initial`.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (output, _) = watch::channel(initial);
        Self {
            delay,
            output: Arc::new(output),
            pending: Arc::new(Mutex::new(Pending {
                generation: 0,
                task: None,
            })),
        }
    }

    /// Feed a new input value.
    ///
    /// Must be called from within a tokio runtime unless the delay is zero, in which
    /// case the output is updated before this returns.
    pub fn push(&self, value: T) {
        let mut pending = mutex_lock(&self.pending, SOURCE, "push");
        pending.generation = pending.generation.wrapping_add(1);
        if let Some(task) = pending.task.take() {
            task.abort();
        }

        if self.delay.is_zero() {
            publish(&self.output, value);
            return;
        }

        let generation = pending.generation;
        let deadline = Instant::now() + self.delay;
        let shared = Arc::clone(&self.pending);
        let output = Arc::clone(&self.output);
        pending.task = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            let mut pending = mutex_lock(&shared, SOURCE, "flush");
            if pending.generation != generation {
                return;
            }
            pending.task = None;
            trace!(generation, "debounced value settled");
            publish(&output, value);
        }));
    }

    /// The settled output value.
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    /// Observe output changes. Only settled values are ever published.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.subscribe()
    }

    /// Whether an update is scheduled but has not landed yet.
    pub fn is_pending(&self) -> bool {
        mutex_lock(&self.pending, SOURCE, "is_pending").task.is_some()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(task) = mutex_lock(&self.pending, SOURCE, "drop").task.take() {
            task.abort();
        }
    }
}

fn publish<T: PartialEq>(output: &watch::Sender<T>, value: T) {
    output.send_if_modified(|current| {
        if *current == value {
            return false;
        }
        *current = value;
        true
    });
}
