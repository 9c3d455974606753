/// Result of a page-lock attempt.
///
/// `ok` and `locked` are independent. Pinning is advisory hardening, so a
/// refused pin is *not* a failure: the operation reports `ok: true` with
/// `locked: false`, and the caller proceeds without swap protection.
///
/// Callers must branch on `locked`, not `ok`, to detect a failed pin:
/// `ok` stays `true` even when the OS refuses the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LockOutcome {
    /// The operation ran without a fatal error.
    pub ok: bool,
    /// The pages backing the buffer are now pinned.
    pub locked: bool,
}

/// Result of an unlock or wipe operation.
///
/// `ok` is `false` only when the underlying OS call reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Outcome {
    /// The operation ran without a reported OS-level failure.
    pub ok: bool,
}
