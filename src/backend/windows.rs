use core::ptr::NonNull;

use super::{ffi, MemoryBackend};
use crate::outcome::{LockOutcome, Outcome};

/// Page pinning for Windows, backed by `VirtualLock`/`VirtualUnlock`.
///
/// `VirtualLock` is capped by the process working-set minimum, so a refused
/// pin is expected under pressure; `lock` reports it only through `locked`.
pub struct WindowsBackend;

impl MemoryBackend for WindowsBackend {
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
        let locked = match ffi::windows::virtual_lock(ptr, region.len()) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(target: "memseal", error = %err, "VirtualLock refused");
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
        match ffi::windows::virtual_unlock(ptr, region.len()) {
            Ok(()) => Outcome { ok: true },
            Err(err) => {
                tracing::debug!(target: "memseal", error = %err, "VirtualUnlock failed");
                Outcome { ok: false }
            }
        }
    }
}
