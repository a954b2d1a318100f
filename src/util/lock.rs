use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Lock `lock`, taking the guard back from a poisoned mutex.
///
/// Guarded state here is bookkeeping (timer handles, generations) that stays consistent
/// even if a holder panicked mid-update.
pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    owner: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!(owner, op, "mutex poisoned; continuing with inner state");
        poisoned.into_inner()
    })
}
