use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Resolves secret references handed over in the invocation inputs.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the secret cannot be resolved.
    async fn secret(&self, name: &str) -> Result<String>;
}

/// Secrets known up front, e.g. loaded from the configuration file.
#[derive(Clone, Default)]
pub struct StaticSecrets {
    secrets: HashMap<String, String>,
}

impl StaticSecrets {
    #[must_use]
    pub const fn new(secrets: HashMap<String, String>) -> Self { Self { secrets } }
}

impl std::fmt::Debug for StaticSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticSecrets").field("names", &self.secrets.keys()).finish()
    }
}

#[async_trait]
impl SecretProvider for StaticSecrets {
    async fn secret(&self, name: &str) -> Result<String> {
        self.secrets.get(name).cloned().ok_or_else(|| Error::Secret {
            name: name.to_string(),
            message: "no such secret".to_string(),
        })
    }
}
