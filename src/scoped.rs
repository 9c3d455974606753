//! Scoped helpers that pin a region for the duration of a closure, then
//! unpin and wipe it.
//!
//! Degradation ladder: a disabled policy, a platform without page locking,
//! or an OS-refused pin all fall back to running the closure unpinned and
//! still wiping afterwards. Under a strict policy the helper instead refuses
//! before the closure ever sees the buffer. Each degradation reason is
//! logged once per process.

use core::slice;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::error::Error;
use crate::policy::Policy;
use crate::stats;

static WARN_POLICY_DISABLED: AtomicBool = AtomicBool::new(false);
static WARN_UNSUPPORTED: AtomicBool = AtomicBool::new(false);
static WARN_PIN_REFUSED: AtomicBool = AtomicBool::new(false);
static WARN_UNLOCK_FAILED: AtomicBool = AtomicBool::new(false);

fn warn_once(flag: &AtomicBool, message: &str) {
    if !flag.swap(true, Ordering::Relaxed) {
        tracing::warn!(target: "memseal", "{message}");
    }
}

/// Unwind cleanup: wipes (and unpins, when pinned) the region if the
/// closure panics. Outcomes are discarded on this path.
struct Cleanup {
    ptr: *mut u8,
    len: usize,
    unpin: bool,
    armed: bool,
}

impl Cleanup {
    fn new(region: &mut [u8], unpin: bool) -> Self {
        Self {
            ptr: region.as_mut_ptr(),
            len: region.len(),
            unpin,
            armed: true,
        }
    }
}

impl Drop for Cleanup {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        // Safety: ptr/len describe the caller's region, which outlives the
        // scoped call; the closure's borrow ended when it unwound.
        let region = unsafe { slice::from_raw_parts_mut(self.ptr, self.len) };
        if self.unpin {
            let _ = crate::unlock(region);
        }
        stats::record_wipe();
        let _ = crate::wipe(region);
    }
}

/// Runs `f` over `region` with its pages pinned, then unpins and wipes.
///
/// The region is wiped before this returns whether the closure returns or
/// panics. When pinning is unavailable (disabled by [`Policy`],
/// unimplemented on the platform, or refused by the OS), the closure runs
/// unpinned under a lenient policy and is refused with
/// [`Error::LockingUnavailable`] under a strict one. A failed unpin after
/// the closure is a logged warning normally and [`Error::UnlockFailed`]
/// under a strict policy; the wipe has already happened either way.
pub fn with_locked<T, F>(region: &mut [u8], f: F) -> Result<T, Error>
where
    F: FnOnce(&mut [u8]) -> T,
{
    let policy = Policy::from_env();

    if !policy.enabled {
        warn_once(
            &WARN_POLICY_DISABLED,
            "secure-memory policy disabled; running without page lock",
        );
        return run_unpinned(region, f, policy);
    }

    if !crate::is_supported() {
        warn_once(
            &WARN_UNSUPPORTED,
            "page locking not implemented on this platform; running without page lock",
        );
        return run_unpinned(region, f, policy);
    }

    stats::record_lock_attempt();
    let lock = crate::lock(region);
    if !lock.locked {
        stats::record_lock_refused();
        warn_once(
            &WARN_PIN_REFUSED,
            "OS refused to pin pages; running without page lock",
        );
        return run_unpinned(region, f, policy);
    }
    stats::record_lock_success();

    let mut cleanup = Cleanup::new(region, true);
    let value = f(&mut *region);
    cleanup.armed = false;

    let unlock = crate::unlock(region);
    stats::record_wipe();
    let _ = crate::wipe(region);

    if !unlock.ok {
        warn_once(
            &WARN_UNLOCK_FAILED,
            "failed to release page lock after scoped use",
        );
        if policy.strict {
            return Err(Error::UnlockFailed);
        }
    }

    Ok(value)
}

/// Copies `source` into a transient buffer and runs [`with_locked`] over
/// the copy. The source is left intact; the copy is wiped before this
/// returns, including on the strict-policy refusal path.
pub fn with_locked_copy<T, F>(source: &[u8], f: F) -> Result<T, Error>
where
    F: FnOnce(&mut [u8]) -> T,
{
    let mut transient = source.to_vec();
    let result = with_locked(&mut transient, f);
    if matches!(result, Err(Error::LockingUnavailable)) {
        // The refusal happened before any wipe; the copy is ours to destroy.
        stats::record_wipe();
        let _ = crate::wipe(&mut transient);
    }
    result
}

fn run_unpinned<T, F>(region: &mut [u8], f: F, policy: Policy) -> Result<T, Error>
where
    F: FnOnce(&mut [u8]) -> T,
{
    stats::record_fallback_run();
    if policy.strict {
        // Refuse before the closure sees the buffer; the caller still owns
        // its contents and decides what to do with them.
        return Err(Error::LockingUnavailable);
    }

    let mut cleanup = Cleanup::new(region, false);
    let value = f(&mut *region);
    cleanup.armed = false;

    stats::record_wipe();
    let _ = crate::wipe(region);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use std::env;

    use super::*;
    use crate::policy::{ENABLED_ENV, STRICT_ENV};

    fn clear_policy_env() {
        env::remove_var(ENABLED_ENV);
        env::remove_var(STRICT_ENV);
    }

    #[test]
    #[serial]
    fn runs_the_closure_and_wipes_afterwards() {
        clear_policy_env();
        let mut secret = *b"0123456789abcdef";

        let sum = with_locked(&mut secret, |region| {
            region.iter().map(|byte| u32::from(*byte)).sum::<u32>()
        })
        .unwrap();

        assert!(sum > 0);
        assert!(secret.iter().all(|byte| *byte == 0));
    }

    #[test]
    #[serial]
    fn strict_with_disabled_policy_refuses_before_running() {
        env::set_var(ENABLED_ENV, "0");
        env::set_var(STRICT_ENV, "1");

        let mut secret = [0x55u8; 8];
        let mut ran = false;
        let result = with_locked(&mut secret, |_| ran = true);

        assert_eq!(result, Err(Error::LockingUnavailable));
        assert!(!ran);
        // The buffer was never handed out, so its contents are untouched.
        assert!(secret.iter().all(|byte| *byte == 0x55));
        clear_policy_env();
    }

    #[test]
    #[serial]
    fn disabled_policy_still_runs_and_wipes_when_lenient() {
        env::set_var(ENABLED_ENV, "0");
        env::remove_var(STRICT_ENV);

        let mut secret = [0x77u8; 32];
        let len = with_locked(&mut secret, |region| region.len()).unwrap();

        assert_eq!(len, 32);
        assert!(secret.iter().all(|byte| *byte == 0));
        clear_policy_env();
    }

    #[test]
    #[serial]
    fn wipes_when_the_closure_panics() {
        clear_policy_env();
        let mut secret = vec![0x99u8; 16];

        let result = std::panic::catch_unwind(core::panic::AssertUnwindSafe(|| {
            let _ = with_locked(&mut secret, |_| panic!("boom"));
        }));

        assert!(result.is_err());
        assert!(secret.iter().all(|byte| *byte == 0));
    }

    #[test]
    #[serial]
    fn copy_leaves_the_source_intact() {
        clear_policy_env();
        let source = vec![0x42u8; 24];

        let len = with_locked_copy(&source, |region| {
            assert!(region.iter().all(|byte| *byte == 0x42));
            region.len()
        })
        .unwrap();

        assert_eq!(len, 24);
        assert!(source.iter().all(|byte| *byte == 0x42));
    }

    #[test]
    #[serial]
    fn counters_track_the_scoped_path() {
        clear_policy_env();
        stats::reset();

        let mut secret = [1u8; 64];
        with_locked(&mut secret, |_| ()).unwrap();

        let counters = stats::snapshot();
        if crate::is_supported() {
            assert_eq!(counters.lock_attempts, 1);
            assert_eq!(counters.lock_success + counters.lock_refused, 1);
        } else {
            assert_eq!(counters.fallback_runs, 1);
        }
        assert_eq!(counters.wipes, 1);
    }
}
