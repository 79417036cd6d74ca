use serde::{Deserialize, Serialize};

use crate::config::Error;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RenderConfig {
    /// Currency code printed in front of daily price estimates.
    #[serde(default = "RenderConfig::default_price_currency")]
    pub price_currency: String,
}

impl RenderConfig {
    #[inline]
    pub fn default_price_currency() -> String {
        deployment_notifier_core::DEFAULT_PRICE_CURRENCY.to_string()
    }
}

impl Default for RenderConfig {
    fn default() -> Self { Self { price_currency: Self::default_price_currency() } }
}

impl TryFrom<RenderConfig> for deployment_notifier_core::config::RenderConfig {
    type Error = Error;

    fn try_from(RenderConfig { price_currency }: RenderConfig) -> Result<Self, Error> {
        let price_currency = price_currency.trim().to_string();
        if price_currency.is_empty() {
            return Err(Error::EmptyPriceCurrency);
        }
        Ok(Self { price_currency })
    }
}
