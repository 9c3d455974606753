use core::ptr::NonNull;

use super::{ffi, MemoryBackend};
use crate::outcome::{LockOutcome, Outcome};

/// Page pinning for the Unix family, backed by `mlock`/`munlock`.
///
/// Pinning is best-effort: `mlock` commonly fails under `RLIMIT_MEMLOCK`,
/// and a refused pin must not stop the caller from proceeding with the
/// secret, so `lock` reports the refusal only through `locked`.
pub struct UnixBackend;

impl MemoryBackend for UnixBackend {
    const PAGE_LOCKING: bool = true;

    fn lock(region: &mut [u8]) -> LockOutcome {
        if region.is_empty() {
            return LockOutcome {
                ok: true,
                locked: false,
            };
        }

        // Safety: a non-empty slice's data pointer is never null.
        let ptr = unsafe { NonNull::new_unchecked(region.as_mut_ptr()) };
        let locked = match ffi::unix::mlock(ptr, region.len()) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(target: "memseal", error = %err, "mlock refused");
                false
            }
        };

        LockOutcome { ok: true, locked }
    }

    fn unlock(region: &mut [u8]) -> Outcome {
        if region.is_empty() {
            return Outcome { ok: true };
        }

        // Safety: a non-empty slice's data pointer is never null.
        let ptr = unsafe { NonNull::new_unchecked(region.as_mut_ptr()) };
        match ffi::unix::munlock(ptr, region.len()) {
            Ok(()) => Outcome { ok: true },
            Err(err) => {
                tracing::debug!(target: "memseal", error = %err, "munlock failed");
                Outcome { ok: false }
            }
        }
    }
}
