//! Queue tuning knobs, loaded from the environment.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },
}

/// Externally configured queue names and job parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueTuning {
    /// Name of the queue carrying creation notifications.
    pub notify_queue: String,
    /// Name of the queue carrying SLA checks.
    pub sla_queue: String,
    /// Maximum delivery attempts for a notification.
    pub notify_attempts: u32,
    /// Base delay of the notification retry backoff.
    pub notify_backoff_ms: u64,
    /// How long after creation the SLA check fires.
    pub sla_delay_ms: u64,
}

impl Default for QueueTuning {
    fn default() -> Self {
        Self {
            notify_queue: "ticket-notify".to_string(),
            sla_queue: "ticket-sla".to_string(),
            notify_attempts: 3,
            notify_backoff_ms: 1_000,
            // 15 minutes
            sla_delay_ms: 900_000,
        }
    }
}

impl QueueTuning {
    /// Build the tuning from environment variables, falling back to defaults.
    ///
    /// - `TICKET_NOTIFY_QUEUE` / `TICKET_SLA_QUEUE`: queue names
    /// - `TICKET_NOTIFY_ATTEMPTS`: max notification attempts
    /// - `TICKET_NOTIFY_BACKOFF_MS`: notification backoff base delay
    /// - `TICKET_SLA_DELAY_MS`: SLA check delay
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut tuning = Self::default();

        if let Some(name) = env_non_empty("TICKET_NOTIFY_QUEUE") {
            tuning.notify_queue = name;
        }
        if let Some(name) = env_non_empty("TICKET_SLA_QUEUE") {
            tuning.sla_queue = name;
        }
        if let Some(value) = env_non_empty("TICKET_NOTIFY_ATTEMPTS") {
            tuning.notify_attempts = parse_var("TICKET_NOTIFY_ATTEMPTS", &value)?;
        }
        if let Some(value) = env_non_empty("TICKET_NOTIFY_BACKOFF_MS") {
            tuning.notify_backoff_ms = parse_var("TICKET_NOTIFY_BACKOFF_MS", &value)?;
        }
        if let Some(value) = env_non_empty("TICKET_SLA_DELAY_MS") {
            tuning.sla_delay_ms = parse_var("TICKET_SLA_DELAY_MS", &value)?;
        }

        Ok(tuning)
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidVar {
        var,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_knobs() {
        let tuning = QueueTuning::default();
        assert_eq!(tuning.notify_queue, "ticket-notify");
        assert_eq!(tuning.sla_queue, "ticket-sla");
        assert_eq!(tuning.notify_attempts, 3);
        assert_eq!(tuning.notify_backoff_ms, 1_000);
        assert_eq!(tuning.sla_delay_ms, 900_000);
    }

    #[test]
    fn parse_var_rejects_garbage() {
        assert!(parse_var::<u32>("TICKET_NOTIFY_ATTEMPTS", "three").is_err());
        assert_eq!(parse_var::<u32>("TICKET_NOTIFY_ATTEMPTS", "5").unwrap(), 5);
    }
}
