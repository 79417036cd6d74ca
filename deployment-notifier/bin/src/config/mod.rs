mod api;
mod error;
mod polling;
mod render;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use notifier_cli_common::config::LogConfig;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{
    api::ApiConfig,
    error::Error,
    polling::{PollConfig, PollingConfig},
    render::RenderConfig,
};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub render: RenderConfig,

    /// Secret values by the names invocation inputs refer to them with.
    #[serde(default)]
    pub secrets: HashMap<String, String>,
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf {
        [
            deployment_notifier_core::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(deployment_notifier_core::CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    /// Locations searched, in order, when no configuration file is given.
    pub fn search_paths() -> Vec<PathBuf> {
        std::iter::once(Self::default_path())
            .chain(
                deployment_notifier_core::fallback_project_config_directories()
                    .into_iter()
                    .map(|dir| dir.join(deployment_notifier_core::CONFIG_NAME)),
            )
            .collect()
    }

    /// Loads the first existing file among `candidates`, or the defaults
    /// when none exists.
    pub fn discover<I>(candidates: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        match candidates.into_iter().find(|path| path.is_file()) {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let data = std::fs::read_to_string(&path)
                .context(error::OpenConfigSnafu { filename: path.as_ref().to_path_buf() })?;

            serde_yaml::from_str(&data)
                .context(error::ParseConfigSnafu { filename: path.as_ref().to_path_buf() })?
        };

        config.log.file_path = config
            .log
            .file_path
            .map(|path| {
                path.try_resolve()
                    .map(|resolved| resolved.to_path_buf())
                    .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
            })
            .transpose()?;

        Ok(config)
    }

    /// Splits off the settings the notifier runs with, leaving the logging
    /// setup and the secrets with the caller.
    pub fn runtime_config(&self) -> Result<deployment_notifier_core::config::Config, Error> {
        Ok(deployment_notifier_core::config::Config {
            api: self.api.clone().try_into()?,
            polling: self.polling.into(),
            render: self.render.clone().try_into()?,
        })
    }
}
