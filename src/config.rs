use crate::limits::MAX_INTERVALS_PER_TEACHER;
use crate::notify::DEFAULT_CHANNEL_CAPACITY;

/// Runtime settings, read from `OFFICEHOURS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prometheus listener port. Disabled when unset.
    pub metrics_port: Option<u16>,
    pub max_intervals_per_teacher: usize,
    /// Per-user broadcast buffer; slow receivers lag past this.
    pub notify_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metrics_port: None,
            max_intervals_per_teacher: MAX_INTERVALS_PER_TEACHER,
            notify_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            metrics_port: lookup("OFFICEHOURS_METRICS_PORT").and_then(|s| s.parse().ok()),
            max_intervals_per_teacher: lookup("OFFICEHOURS_MAX_INTERVALS_PER_TEACHER")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_intervals_per_teacher),
            notify_capacity: lookup("OFFICEHOURS_NOTIFY_CAPACITY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.notify_capacity),
        }
    }
}
