//! Runtime formatting configuration.
//!
//! Read from the environment on first use and cached thereafter:
//! - `TINYFMT_MODE` selects the [`ArgumentPolicy`]:
//!   - `strict` (default): the argument list is checked against the format
//!     string before anything is written. A missing or mismatched argument
//!     fails the call with no output.
//!   - `hardened`: mismatches are repaired deterministically (numeric
//!     reinterpretation, `(null)` for non-text, zero for missing) and
//!     counted in the metrics.
//! - `TINYFMT_BUFFER_SIZE` sets the output buffer capacity in bytes.

use std::sync::OnceLock;

pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;
pub const MIN_BUFFER_CAPACITY: usize = 64;
pub const MAX_BUFFER_CAPACITY: usize = 1 << 20;

/// Free bytes kept below capacity before a proactive flush.
pub const FLUSH_HEADROOM: usize = 96;

pub const MODE_ENV: &str = "TINYFMT_MODE";
pub const BUFFER_SIZE_ENV: &str = "TINYFMT_BUFFER_SIZE";

/// How a call reacts to arguments that do not match its specifiers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentPolicy {
    /// Reject the call up front.
    #[default]
    Strict,
    /// Repair the argument and keep going.
    Hardened,
}

impl ArgumentPolicy {
    /// Parse from string (case-insensitive). Unknown values are strict.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hardened" | "repair" | "lenient" => Self::Hardened,
            _ => Self::Strict,
        }
    }

    #[must_use]
    pub const fn repairs_enabled(self) -> bool {
        matches!(self, Self::Hardened)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Hardened => "hardened",
        }
    }
}

/// Per-call formatter settings.
///
/// Invariant: `1 <= flush_threshold <= capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    policy: ArgumentPolicy,
    capacity: usize,
    flush_threshold: usize,
}

impl FormatConfig {
    #[must_use]
    pub const fn new(policy: ArgumentPolicy) -> Self {
        Self {
            policy,
            capacity: DEFAULT_BUFFER_CAPACITY,
            flush_threshold: DEFAULT_BUFFER_CAPACITY - FLUSH_HEADROOM,
        }
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: ArgumentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the buffer capacity (clamped) and reset the flush threshold to
    /// its default for that capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.clamp(MIN_BUFFER_CAPACITY, MAX_BUFFER_CAPACITY);
        self.flush_threshold = default_threshold(self.capacity);
        self
    }

    /// Flush once the buffered length exceeds `threshold`.
    #[must_use]
    pub fn with_flush_threshold(mut self, threshold: usize) -> Self {
        self.flush_threshold = threshold.clamp(1, self.capacity);
        self
    }

    #[must_use]
    pub const fn policy(&self) -> ArgumentPolicy {
        self.policy
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub const fn flush_threshold(&self) -> usize {
        self.flush_threshold
    }

    /// Build from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let policy = lookup(MODE_ENV)
            .map(|v| ArgumentPolicy::from_str_loose(&v))
            .unwrap_or_default();
        let config = Self::new(policy);
        match lookup(BUFFER_SIZE_ENV).and_then(|v| v.trim().parse::<usize>().ok()) {
            Some(capacity) => config.with_capacity(capacity),
            None => config,
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::new(ArgumentPolicy::Strict)
    }
}

fn default_threshold(capacity: usize) -> usize {
    capacity
        .saturating_sub(FLUSH_HEADROOM)
        .max(capacity / 2)
        .max(1)
}

static GLOBAL_CONFIG: OnceLock<FormatConfig> = OnceLock::new();

/// Get the environment configuration (read on first call, cached thereafter).
#[must_use]
pub fn global_config() -> FormatConfig {
    *GLOBAL_CONFIG.get_or_init(FormatConfig::from_env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_policies() {
        assert_eq!(ArgumentPolicy::from_str_loose("strict"), ArgumentPolicy::Strict);
        assert_eq!(ArgumentPolicy::from_str_loose("STRICT"), ArgumentPolicy::Strict);
        assert_eq!(
            ArgumentPolicy::from_str_loose("hardened"),
            ArgumentPolicy::Hardened
        );
        assert_eq!(
            ArgumentPolicy::from_str_loose(" Repair "),
            ArgumentPolicy::Hardened
        );
        assert_eq!(ArgumentPolicy::from_str_loose("bogus"), ArgumentPolicy::Strict);
    }

    #[test]
    fn default_matches_classic_buffer() {
        let config = FormatConfig::default();
        assert_eq!(config.policy(), ArgumentPolicy::Strict);
        assert_eq!(config.capacity(), 4096);
        assert_eq!(config.flush_threshold(), 4000);
    }

    #[test]
    fn capacity_is_clamped_and_threshold_follows() {
        let small = FormatConfig::default().with_capacity(1);
        assert_eq!(small.capacity(), MIN_BUFFER_CAPACITY);
        assert_eq!(small.flush_threshold(), MIN_BUFFER_CAPACITY / 2);

        let huge = FormatConfig::default().with_capacity(usize::MAX);
        assert_eq!(huge.capacity(), MAX_BUFFER_CAPACITY);
        assert_eq!(huge.flush_threshold(), MAX_BUFFER_CAPACITY - FLUSH_HEADROOM);
    }

    #[test]
    fn threshold_stays_within_capacity() {
        let config = FormatConfig::default().with_capacity(128);
        assert_eq!(config.with_flush_threshold(0).flush_threshold(), 1);
        assert_eq!(config.with_flush_threshold(10_000).flush_threshold(), 128);
        assert_eq!(config.with_flush_threshold(100).flush_threshold(), 100);
    }

    #[test]
    fn lookup_reads_both_keys() {
        let config = FormatConfig::from_lookup(|key| match key {
            MODE_ENV => Some("hardened".into()),
            BUFFER_SIZE_ENV => Some("512".into()),
            _ => None,
        });
        assert_eq!(config.policy(), ArgumentPolicy::Hardened);
        assert_eq!(config.capacity(), 512);
        assert_eq!(config.flush_threshold(), 512 - FLUSH_HEADROOM);
    }

    #[test]
    fn lookup_ignores_unparseable_size() {
        let config = FormatConfig::from_lookup(|key| {
            (key == BUFFER_SIZE_ENV).then(|| "lots".to_string())
        });
        assert_eq!(config, FormatConfig::default());
    }
}
