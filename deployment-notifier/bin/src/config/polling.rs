use std::time::Duration;

use deployment_notifier_core::poll::PollPolicy;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PollingConfig {
    /// Waiting for a catalog request to reach its approval stage.
    #[serde(default)]
    pub approval: PollConfig,

    /// Waiting for an upfront price estimate.
    #[serde(default)]
    pub upfront_price: PollConfig,
}

/// Leaving both fields out polls without limit or pause.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PollConfig {
    #[serde(default)]
    pub max_attempts: Option<u32>,

    #[serde(default)]
    pub interval_ms: u64,
}

impl From<PollConfig> for PollPolicy {
    fn from(PollConfig { max_attempts, interval_ms }: PollConfig) -> Self {
        Self::new(max_attempts, Duration::from_millis(interval_ms))
    }
}

impl From<PollingConfig> for deployment_notifier_core::config::PollingConfig {
    fn from(PollingConfig { approval, upfront_price }: PollingConfig) -> Self {
        Self { approval: approval.into(), upfront_price: upfront_price.into() }
    }
}
