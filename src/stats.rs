//! Process-wide counters for the scoped helpers.
//!
//! The core operations deliberately keep no state across calls; these
//! counters belong to the scoped layer and exist so embedders can observe
//! how often pinning succeeds in the field. Plain relaxed atomics: the
//! counts are diagnostics, not synchronization.

use core::sync::atomic::{AtomicU64, Ordering};

static LOCK_ATTEMPTS: AtomicU64 = AtomicU64::new(0);
static LOCK_SUCCESS: AtomicU64 = AtomicU64::new(0);
static LOCK_REFUSED: AtomicU64 = AtomicU64::new(0);
static WIPES: AtomicU64 = AtomicU64::new(0);
static FALLBACK_RUNS: AtomicU64 = AtomicU64::new(0);

/// Point-in-time snapshot of the scoped-helper counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Pin attempts made by the scoped helpers.
    pub lock_attempts: u64,
    /// Attempts where the OS actually pinned the pages.
    pub lock_success: u64,
    /// Attempts where the OS refused the pin.
    pub lock_refused: u64,
    /// Buffers wiped by the scoped helpers.
    pub wipes: u64,
    /// Closure runs that proceeded without a page lock.
    pub fallback_runs: u64,
}

/// Returns the current counter values.
pub fn snapshot() -> Stats {
    Stats {
        lock_attempts: LOCK_ATTEMPTS.load(Ordering::Relaxed),
        lock_success: LOCK_SUCCESS.load(Ordering::Relaxed),
        lock_refused: LOCK_REFUSED.load(Ordering::Relaxed),
        wipes: WIPES.load(Ordering::Relaxed),
        fallback_runs: FALLBACK_RUNS.load(Ordering::Relaxed),
    }
}

/// Zeroes every counter. Used by tests and [`ops_check`](crate::ops_check).
pub fn reset() {
    LOCK_ATTEMPTS.store(0, Ordering::Relaxed);
    LOCK_SUCCESS.store(0, Ordering::Relaxed);
    LOCK_REFUSED.store(0, Ordering::Relaxed);
    WIPES.store(0, Ordering::Relaxed);
    FALLBACK_RUNS.store(0, Ordering::Relaxed);
}

pub(crate) fn record_lock_attempt() {
    LOCK_ATTEMPTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_lock_success() {
    LOCK_SUCCESS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_lock_refused() {
    LOCK_REFUSED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_wipe() {
    WIPES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_fallback_run() {
    FALLBACK_RUNS.fetch_add(1, Ordering::Relaxed);
}
