//! Self-check for the scoped helpers: exercises the pinned and
//! transient-copy paths on short probe buffers and reports what happened.

use crate::error::Error;
use crate::policy::Policy;
use crate::scoped::{with_locked, with_locked_copy};
use crate::stats::{self, Stats};

const PROBE: &[u8] = b"memseal-ops-probe";
const TRANSIENT: &[u8] = b"memseal-ops-transient";

/// Overall judgement derived from an [`ops_check`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    /// Both helpers ran and every closure run was page-pinned.
    Healthy,
    /// The helpers ran, but at least one closure ran without a page lock.
    Degraded,
    /// A strict policy blocked the helpers before they ran.
    StrictBlocked,
}

/// Outcome of one [`ops_check`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpsReport {
    /// Policy in effect during the run.
    pub policy: Policy,
    /// Whether the platform implements real page locking.
    pub native_supported: bool,
    /// The locked-buffer helper handed a closure the probe buffer.
    pub locked_path_used: bool,
    /// The transient-copy helper handed a closure the copied buffer.
    pub copy_path_used: bool,
    /// The probe buffer was all-zero after the helpers returned.
    pub probe_wiped: bool,
    /// The transient helper's source buffer survived unmodified.
    pub copy_source_retained: bool,
    /// First error reported by the helpers, if any.
    pub error: Option<Error>,
    /// Counter snapshot taken after the exercise.
    pub stats: Stats,
    /// Derived judgement.
    pub assessment: Assessment,
    /// One-line verdict for logs and health endpoints.
    pub summary: &'static str,
}

/// Exercises [`with_locked`](crate::with_locked) and
/// [`with_locked_copy`](crate::with_locked_copy) on short probe buffers and
/// reports the result. Resets the [`stats`](crate::stats) counters first so
/// the snapshot covers exactly this run. Purely in-memory: the probe
/// contents are fixed constants and are never logged.
pub fn ops_check() -> OpsReport {
    stats::reset();

    let policy = Policy::from_env();
    let native_supported = crate::is_supported();

    let mut probe = PROBE.to_vec();
    let mut locked_path_used = false;
    let mut copy_path_used = false;

    let mut error = with_locked(&mut probe, |region| {
        locked_path_used = !region.is_empty();
    })
    .err();

    let transient_source = TRANSIENT.to_vec();
    if error.is_none() {
        error = with_locked_copy(&transient_source, |region| {
            copy_path_used = !region.is_empty();
        })
        .err();
    }

    let probe_wiped = probe.iter().all(|byte| *byte == 0);
    let copy_source_retained = transient_source == TRANSIENT;
    let stats = stats::snapshot();

    let (assessment, summary) = assess(
        policy,
        error,
        locked_path_used && copy_path_used,
        probe_wiped,
        &stats,
    );

    OpsReport {
        policy,
        native_supported,
        locked_path_used,
        copy_path_used,
        probe_wiped,
        copy_source_retained,
        error,
        stats,
        assessment,
        summary,
    }
}

fn assess(
    policy: Policy,
    error: Option<Error>,
    both_paths_used: bool,
    probe_wiped: bool,
    stats: &Stats,
) -> (Assessment, &'static str) {
    if error.is_some() && policy.strict {
        return (
            Assessment::StrictBlocked,
            "strict policy blocked the scoped helpers",
        );
    }

    let pinned_end_to_end =
        error.is_none() && both_paths_used && probe_wiped && stats.fallback_runs == 0;

    if policy.enabled && pinned_end_to_end {
        (Assessment::Healthy, "pinned path exercised end to end")
    } else {
        (
            Assessment::Degraded,
            "scoped helpers ran without full page locking; check policy and platform support",
        )
    }
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
    fn exercises_both_paths_and_wipes_the_probe() {
        clear_policy_env();
        let report = ops_check();

        assert!(report.locked_path_used);
        assert!(report.copy_path_used);
        assert!(report.probe_wiped);
        assert!(report.copy_source_retained);
        assert_eq!(report.error, None);
        assert_eq!(report.stats.wipes, 2);

        if report.native_supported && report.stats.lock_refused == 0 {
            assert_eq!(report.assessment, Assessment::Healthy);
        } else {
            assert_eq!(report.assessment, Assessment::Degraded);
        }
    }

    #[test]
    #[serial]
    fn strict_with_disabled_policy_is_blocked() {
        env::set_var(ENABLED_ENV, "0");
        env::set_var(STRICT_ENV, "1");

        let report = ops_check();

        assert_eq!(report.error, Some(Error::LockingUnavailable));
        assert_eq!(report.assessment, Assessment::StrictBlocked);
        assert!(!report.locked_path_used);
        assert!(!report.probe_wiped);
        assert_eq!(report.stats.lock_attempts, 0);
        clear_policy_env();
    }

    #[test]
    #[serial]
    fn disabled_policy_degrades_but_still_runs() {
        env::set_var(ENABLED_ENV, "0");
        env::remove_var(STRICT_ENV);

        let report = ops_check();

        assert!(report.locked_path_used);
        assert!(report.copy_path_used);
        assert!(report.probe_wiped);
        assert_eq!(report.assessment, Assessment::Degraded);
        assert_eq!(report.stats.lock_attempts, 0);
        assert_eq!(report.stats.fallback_runs, 2);
        clear_policy_env();
    }
}
