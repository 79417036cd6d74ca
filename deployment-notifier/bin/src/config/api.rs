use serde::{Deserialize, Serialize};

use crate::config::Error;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_api_version")]
    pub api_version: String,

    #[serde(default = "ApiConfig::default_scheme")]
    pub scheme: String,

    #[serde(default = "ApiConfig::default_verify_tls")]
    pub verify_tls: bool,
}

impl ApiConfig {
    #[inline]
    pub fn default_api_version() -> String {
        deployment_notifier_core::DEFAULT_API_VERSION.to_string()
    }

    #[inline]
    pub fn default_scheme() -> String { "https".to_string() }

    #[inline]
    pub const fn default_verify_tls() -> bool { false }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_version: Self::default_api_version(),
            scheme: Self::default_scheme(),
            verify_tls: Self::default_verify_tls(),
        }
    }
}

impl TryFrom<ApiConfig> for deployment_notifier_core::config::ApiConfig {
    type Error = Error;

    fn try_from(ApiConfig { api_version, scheme, verify_tls }: ApiConfig) -> Result<Self, Error> {
        let scheme = scheme.to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(Error::UnsupportedScheme { scheme });
        }
        Ok(Self { api_version, scheme, verify_tls })
    }
}
