//! Environment-driven policy for the scoped helpers.
//!
//! The policy gates only [`with_locked`](crate::with_locked) and friends; the
//! core operations are always available. It is re-read from the environment
//! on every call rather than cached, so tests and embedders can flip it at
//! runtime.

use std::env;

/// Turns page locking in the scoped helpers on or off. Defaults to on.
pub const ENABLED_ENV: &str = "MEMSEAL_ENABLED";

/// Makes degraded (unpinned) operation an error instead of a warning.
/// Defaults to off.
pub const STRICT_ENV: &str = "MEMSEAL_STRICT";

/// Runtime policy controlling how the scoped helpers degrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Whether the helpers should attempt page locking at all.
    pub enabled: bool,
    /// Whether running without a page lock is an error rather than a
    /// logged degradation.
    pub strict: bool,
}

impl Policy {
    /// Reads the policy from [`ENABLED_ENV`] and [`STRICT_ENV`].
    ///
    /// Accepts `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off`,
    /// case-insensitively; anything else falls back to the default.
    pub fn from_env() -> Self {
        Self {
            enabled: read_flag(ENABLED_ENV, true),
            strict: read_flag(STRICT_ENV, false),
        }
    }

    /// True when the policy permits pinning and the platform implements it.
    pub fn allows_locking(&self) -> bool {
        self.enabled && crate::is_supported()
    }
}

fn read_flag(name: &str, default: bool) -> bool {
    let Ok(raw) = env::var(name) else {
        return default;
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use std::env;

    use super::*;

    fn clear_policy_env() {
        env::remove_var(ENABLED_ENV);
        env::remove_var(STRICT_ENV);
    }

    #[test]
    #[serial]
    fn defaults_are_enabled_and_lenient() {
        clear_policy_env();
        let policy = Policy::from_env();
        assert!(policy.enabled);
        assert!(!policy.strict);
    }

    #[test]
    #[serial]
    fn truthy_and_falsy_spellings() {
        for truthy in ["1", "true", "YES", " on "] {
            env::set_var(STRICT_ENV, truthy);
            assert!(Policy::from_env().strict, "expected {truthy:?} to be true");
        }
        for falsy in ["0", "false", "No", "OFF"] {
            env::set_var(ENABLED_ENV, falsy);
            assert!(!Policy::from_env().enabled, "expected {falsy:?} to be false");
        }
        clear_policy_env();
    }

    #[test]
    #[serial]
    fn garbage_falls_back_to_the_default() {
        env::set_var(ENABLED_ENV, "maybe");
        env::set_var(STRICT_ENV, "2");
        let policy = Policy::from_env();
        assert!(policy.enabled);
        assert!(!policy.strict);
        clear_policy_env();
    }

    #[test]
    #[serial]
    fn disabled_policy_never_allows_locking() {
        env::set_var(ENABLED_ENV, "0");
        assert!(!Policy::from_env().allows_locking());
        clear_policy_env();
    }
}
