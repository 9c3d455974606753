use thiserror::Error;

/// Failures surfaced by the scoped helpers under a strict policy.
///
/// The core operations never return these: degradation there is reported
/// through the outcome records. Only [`with_locked`](crate::with_locked) and
/// [`with_locked_copy`](crate::with_locked_copy) turn degradation into an
/// error, and only when [`Policy::strict`](crate::policy::Policy) is set.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Page locking is required by policy but disabled, unimplemented on
    /// this platform, or refused by the OS.
    #[error("page locking required by policy but unavailable")]
    LockingUnavailable,

    /// The OS reported a failure releasing the page lock after scoped use.
    #[error("failed to release page lock after scoped use")]
    UnlockFailed,
}
