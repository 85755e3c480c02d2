//! Balance and confirmation polling.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::config::PollingConfig;
use crate::observability::metrics;

/// Rejected poller settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("max_attempts must be at least 1")]
pub struct InvalidPollSettings;

/// Errors produced while polling.
#[derive(Debug, Error)]
pub enum PollError<E> {
    /// The check returned something that is not a number.
    #[error("Balance '{0}' is not a number")]
    InvalidBalance(String),

    /// Every attempt observed a zero balance.
    #[error("No funds received after {attempts} attempts")]
    FundsNotReceived { attempts: u32 },

    /// Every attempt came back empty.
    #[error("Not confirmed after {attempts} attempts")]
    NotConfirmed { attempts: u32 },

    /// The check itself failed.
    #[error(transparent)]
    Check(E),
}

/// Attempt budget and delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    max_attempts: u32,
    interval: Duration,
}

impl PollSettings {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

    pub fn new(max_attempts: u32, interval: Duration) -> Result<Self, InvalidPollSettings> {
        if max_attempts == 0 {
            return Err(InvalidPollSettings);
        }
        Ok(Self {
            max_attempts,
            interval,
        })
    }

    pub fn from_config(config: &PollingConfig) -> Result<Self, InvalidPollSettings> {
        Self::new(config.max_attempts, Duration::from_millis(config.interval_ms))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            interval: Self::DEFAULT_INTERVAL,
        }
    }
}

/// Runs a check repeatedly until it reports success or the budget runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Poller {
    settings: PollSettings,
}

impl Poller {
    pub fn new(settings: PollSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Call `check` until it returns a balance greater than zero.
    ///
    /// Returns the first positive balance string exactly as the check
    /// produced it. `"0"`, `"0.0"` and negative values count as not funded.
    pub async fn wait_for_balance<F, Fut, E>(&self, mut check: F) -> Result<String, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            metrics::record_poll_attempt("balance");
            let balance = check().await.map_err(PollError::Check)?;

            let value: f64 = balance
                .trim()
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .ok_or_else(|| PollError::InvalidBalance(balance.clone()))?;

            if value > 0.0 {
                tracing::debug!(attempt, balance = %balance, "Funds detected");
                return Ok(balance);
            }

            tracing::debug!(attempt, max_attempts, "Balance still zero");
            if attempt < max_attempts {
                tokio::time::sleep(self.settings.interval).await;
            }
        }

        Err(PollError::FundsNotReceived {
            attempts: max_attempts,
        })
    }

    /// Call `check` until it yields `Some`. Used for receipts and
    /// signature confirmations.
    pub async fn wait_until_some<T, F, Fut, E>(
        &self,
        kind: &'static str,
        mut check: F,
    ) -> Result<T, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            metrics::record_poll_attempt(kind);
            let result = check().await.map_err(PollError::Check)?;

            if let Some(value) = result {
                return Ok(value);
            }

            tracing::debug!(kind, attempt, max_attempts, "Still pending");
            if attempt < max_attempts {
                tokio::time::sleep(self.settings.interval).await;
            }
        }

        Err(PollError::NotConfirmed {
            attempts: max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, PartialEq, Eq, Error)]
    #[error("invalid address")]
    struct CheckFailed;

    fn poller(max_attempts: u32) -> Poller {
        Poller::new(PollSettings::new(max_attempts, Duration::ZERO).unwrap())
    }

    /// A check that replays a script of balances and counts its calls.
    fn scripted(
        script: &[&str],
    ) -> (
        Arc<AtomicU32>,
        impl FnMut() -> std::future::Ready<Result<String, CheckFailed>>,
    ) {
        let calls = Arc::new(AtomicU32::new(0));
        let queue = Arc::new(Mutex::new(
            script.iter().map(|s| s.to_string()).collect::<VecDeque<_>>(),
        ));
        let counter = calls.clone();
        let check = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let next = queue.lock().unwrap().pop_front().unwrap_or_else(|| "0".to_string());
            std::future::ready(Ok(next))
        };
        (calls, check)
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert_eq!(PollSettings::new(0, Duration::ZERO), Err(InvalidPollSettings));
        let config = PollingConfig {
            max_attempts: 0,
            interval_ms: 10,
        };
        assert!(PollSettings::from_config(&config).is_err());
    }

    #[test]
    fn test_defaults() {
        let settings = PollSettings::default();
        assert_eq!(settings.max_attempts(), 30);
        assert_eq!(settings.interval(), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_funds_after_two_zeros() {
        let (calls, check) = scripted(&["0", "0", "2.5"]);
        let balance = poller(3).wait_for_balance(check).await.unwrap();
        assert_eq!(balance, "2.5");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_always_zero_exhausts_budget() {
        let (calls, check) = scripted(&[]);
        let err = poller(2).wait_for_balance(check).await.unwrap_err();
        assert!(matches!(err, PollError::FundsNotReceived { attempts: 2 }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exact_call_count_for_many_budgets() {
        for max_attempts in 1..=6 {
            let (calls, check) = scripted(&[]);
            let err = poller(max_attempts).wait_for_balance(check).await.unwrap_err();
            assert!(matches!(err, PollError::FundsNotReceived { .. }));
            assert_eq!(calls.load(Ordering::SeqCst), max_attempts);
        }
    }

    #[tokio::test]
    async fn test_stops_after_first_positive() {
        for k in 0..5 {
            let mut script = vec!["0.0"; k];
            script.push("0.000001");
            script.push("7");
            let (calls, check) = scripted(&script);
            let balance = poller(10).wait_for_balance(check).await.unwrap();
            assert_eq!(balance, "0.000001");
            assert_eq!(calls.load(Ordering::SeqCst), k as u32 + 1);
        }
    }

    #[tokio::test]
    async fn test_check_error_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let err = poller(5)
            .wait_for_balance(|| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err::<String, _>(CheckFailed) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::Check(CheckFailed)));
        assert_eq!(err.to_string(), "invalid address");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_numeric_balance() {
        let (_, check) = scripted(&["lots"]);
        let err = poller(3).wait_for_balance(check).await.unwrap_err();
        assert!(matches!(err, PollError::InvalidBalance(ref b) if b == "lots"));
    }

    #[tokio::test]
    async fn test_negative_counts_as_unfunded() {
        let (calls, check) = scripted(&["-1", "0.5"]);
        assert_eq!(poller(3).wait_for_balance(check).await.unwrap(), "0.5");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_only_between_attempts() {
        let poller = Poller::new(PollSettings::new(3, Duration::from_secs(1)).unwrap());
        let (_, check) = scripted(&[]);
        let start = tokio::time::Instant::now();
        let _ = poller.wait_for_balance(check).await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_wait_until_some() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let value = poller(5)
            .wait_until_some("receipt", || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, CheckFailed>(if n >= 2 { Some(n) } else { None }) }
            })
            .await
            .unwrap();
        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_wait_until_some_exhausted() {
        let err = poller(3)
            .wait_until_some("signature", || async { Ok::<Option<()>, CheckFailed>(None) })
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::NotConfirmed { attempts: 3 }));
    }
}
