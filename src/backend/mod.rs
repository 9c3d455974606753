#[cfg(any(
    test,
    not(any(target_family = "unix", target_family = "windows"))
))]
pub mod fallback;
#[cfg(target_family = "unix")]
pub mod unix;
#[cfg(target_family = "windows")]
pub mod windows;

pub mod ffi;

use zeroize::Zeroize;

use crate::outcome::{LockOutcome, Outcome};

/// Platform strategy behind the crate's operations, selected at compile time.
///
/// One implementation exists per platform family; [`Active`] aliases the one
/// built for the current target. Implementors hold no state: every operation
/// is a pure function of the region plus OS state, so the backend is
/// reentrant and safe to call from independent threads as long as the caller
/// does not mutate or free the region concurrently.
pub trait MemoryBackend {
    /// Whether `lock` performs real page pinning on this platform,
    /// as opposed to the declared no-op of the fallback.
    const PAGE_LOCKING: bool;

    /// Pins the pages backing `region` so the OS does not swap them out.
    ///
    /// A refused pin still reports `ok: true`; only `locked` reflects
    /// whether the pages are actually pinned.
    fn lock(region: &mut [u8]) -> LockOutcome;

    /// Releases any pin on the pages backing `region`.
    fn unlock(region: &mut [u8]) -> Outcome;

    /// Overwrites every byte of `region` with zero through a volatile write
    /// path the optimizer cannot elide, even though the buffer is about to
    /// go out of use. Identical on every platform; this is the load-bearing
    /// guarantee where pinning is unavailable.
    fn wipe(region: &mut [u8]) -> Outcome {
        region.zeroize();
        Outcome { ok: true }
    }
}

#[cfg(target_family = "unix")]
pub type Active = unix::UnixBackend;
#[cfg(target_family = "windows")]
pub type Active = windows::WindowsBackend;
#[cfg(not(any(target_family = "unix", target_family = "windows")))]
pub type Active = fallback::FallbackBackend;
