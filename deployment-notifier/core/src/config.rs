use crate::poll::PollPolicy;

/// Runtime settings of one invocation, resolved from the configuration file.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub api: ApiConfig,

    pub polling: PollingConfig,

    pub render: RenderConfig,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Value of the `apiVersion` query parameter sent with every request.
    pub api_version: String,

    pub scheme: String,

    pub verify_tls: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PollingConfig {
    pub approval: PollPolicy,

    pub upfront_price: PollPolicy,
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub price_currency: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_version: crate::DEFAULT_API_VERSION.to_string(),
            scheme: "https".to_string(),
            verify_tls: false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self { Self { price_currency: crate::DEFAULT_PRICE_CURRENCY.to_string() } }
}
