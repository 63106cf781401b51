/// Scheduler configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. The cadence
/// and retry bound are deployment knobs, not constants baked into the
/// code.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Seconds between ticks (default: `300`).
    pub tick_interval_secs: u64,
    /// Adapter attempts per post before it is parked as failed
    /// (default: `3`).
    pub max_publish_attempts: i16,
    /// Deadline for a single adapter call, in seconds (default: `30`).
    /// A timed-out call counts as a retryable failure.
    pub publish_timeout_secs: u64,
    /// How far in the future the default cadence places new slots,
    /// in minutes (default: `60`).
    pub cadence_lead_minutes: i64,
}

impl SchedulerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default |
    /// |------------------------|---------|
    /// | `TICK_INTERVAL_SECS`   | `300`   |
    /// | `MAX_PUBLISH_ATTEMPTS` | `3`     |
    /// | `PUBLISH_TIMEOUT_SECS` | `30`    |
    /// | `CADENCE_LEAD_MINUTES` | `60`    |
    pub fn from_env() -> Self {
        let tick_interval_secs: u64 = std::env::var("TICK_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("TICK_INTERVAL_SECS must be a valid u64");

        let max_publish_attempts: i16 = std::env::var("MAX_PUBLISH_ATTEMPTS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("MAX_PUBLISH_ATTEMPTS must be a valid i16");

        let publish_timeout_secs: u64 = std::env::var("PUBLISH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("PUBLISH_TIMEOUT_SECS must be a valid u64");

        let cadence_lead_minutes: i64 = std::env::var("CADENCE_LEAD_MINUTES")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("CADENCE_LEAD_MINUTES must be a valid i64");

        Self {
            tick_interval_secs,
            max_publish_attempts,
            publish_timeout_secs,
            cadence_lead_minutes,
        }
    }
}
