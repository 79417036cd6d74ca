use deployment_notifier_core::poll::PollPolicy;

use crate::error::{Error, Result};

/// Gates the follow-up requests of one waiting loop.
#[derive(Debug)]
pub struct Poller {
    policy: PollPolicy,
    what: &'static str,
    attempts: u32,
}

impl Poller {
    #[must_use]
    pub const fn new(policy: PollPolicy, what: &'static str) -> Self {
        Self { policy, what, attempts: 0 }
    }

    /// Waits until the next follow-up request may be sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PollingExhausted`] once the policy's attempt budget
    /// is spent.
    pub async fn next_attempt(&mut self) -> Result<()> {
        if !self.policy.allows(self.attempts) {
            return Err(Error::PollingExhausted { what: self.what, attempts: self.attempts });
        }
        self.attempts = self.attempts.saturating_add(1);

        if !self.policy.interval.is_zero() {
            tokio::time::sleep(self.policy.interval).await;
        }
        tracing::debug!(what = self.what, attempt = self.attempts, "Polling again");
        Ok(())
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 { self.attempts }
}
