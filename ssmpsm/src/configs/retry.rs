use std::time::Duration;

use super::{Configs, loaders::environment::parse_env_or};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 200;
const DEFAULT_MAX_DELAY_MS: u64 = 5_000;

/// Exponential backoff for transient store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryConfig {
    /// A single attempt, no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1 = the first retry):
    /// `base_delay * 2^(attempt - 1)`, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

#[async_trait::async_trait]
impl Configs for RetryConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let max_attempts = parse_env_or("SSMPSM_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err("SSMPSM_MAX_ATTEMPTS must be at least 1".into());
        }

        Ok(RetryConfig {
            max_attempts,
            base_delay: Duration::from_millis(parse_env_or(
                "SSMPSM_RETRY_BASE_DELAY_MS",
                DEFAULT_BASE_DELAY_MS,
            )?),
            max_delay: Duration::from_millis(parse_env_or(
                "SSMPSM_RETRY_MAX_DELAY_MS",
                DEFAULT_MAX_DELAY_MS,
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_delay_doubles_and_caps() {
        let config = RetryConfig {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
        };

        assert_eq!(config.delay_for(1), Duration::from_millis(100));
        assert_eq!(config.delay_for(2), Duration::from_millis(200));
        assert_eq!(config.delay_for(3), Duration::from_millis(400));
        assert_eq!(config.delay_for(4), Duration::from_millis(500));
        assert_eq!(config.delay_for(40), Duration::from_millis(500));
    }

    #[tokio::test]
    #[serial]
    async fn test_load_defaults() {
        unsafe {
            std::env::remove_var("SSMPSM_MAX_ATTEMPTS");
            std::env::remove_var("SSMPSM_RETRY_BASE_DELAY_MS");
            std::env::remove_var("SSMPSM_RETRY_MAX_DELAY_MS");
        }

        assert_eq!(RetryConfig::load().await.unwrap(), RetryConfig::default());
    }

    #[tokio::test]
    #[serial]
    async fn test_load_rejects_zero_attempts() {
        unsafe {
            std::env::set_var("SSMPSM_MAX_ATTEMPTS", "0");
        }

        assert!(RetryConfig::load().await.is_err());

        unsafe {
            std::env::remove_var("SSMPSM_MAX_ATTEMPTS");
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_load_rejects_garbage() {
        unsafe {
            std::env::set_var("SSMPSM_RETRY_BASE_DELAY_MS", "soon");
        }

        assert!(RetryConfig::load().await.is_err());

        unsafe {
            std::env::remove_var("SSMPSM_RETRY_BASE_DELAY_MS");
        }
    }
}
