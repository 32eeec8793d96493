//! Scheduler configuration.

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Maximum number of entries in the pending list. Enqueue calls are
    /// rejected with `QueueFull` once this is reached; the job currently
    /// being processed still counts until its terminal transition.
    pub capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl SchedulerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            capacity: std::env::var("CHIRP_QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(256),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(SchedulerConfig::default().capacity, 256);
    }
}
