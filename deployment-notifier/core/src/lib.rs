pub mod config;
pub mod error;
pub mod model;
pub mod poll;
pub mod time;

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use directories::ProjectDirs;

pub use self::error::{Error, Result};

pub const PROJECT_NAME: &str = "deployment-notifier";

pub const PROGRAM_NAME: &str = "deployment-notifier";
pub const CONFIG_NAME: &str = "deployment-notifier.yaml";

/// Automation API version every request is pinned to unless configured
/// otherwise.
pub const DEFAULT_API_VERSION: &str = "2021-07-15";

pub const DEFAULT_PRICE_CURRENCY: &str = "AED";

pub static PROJECT_CONFIG_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    ProjectDirs::from("", PROJECT_NAME, PROJECT_NAME).map_or_else(
        || PathBuf::from("/etc").join(PROJECT_NAME),
        |dirs| dirs.config_dir().to_path_buf(),
    )
});

/// Directories searched for [`CONFIG_NAME`] after [`PROJECT_CONFIG_DIR`].
#[must_use]
pub fn fallback_project_config_directories() -> Vec<PathBuf> {
    let Some(user_dirs) = directories::UserDirs::new() else {
        return vec![[Path::new("/"), Path::new("etc"), Path::new(PROJECT_NAME)].iter().collect()];
    };
    vec![
        [user_dirs.home_dir(), Path::new(".config"), Path::new(PROJECT_NAME)].iter().collect(),
        [user_dirs.home_dir(), Path::new(&format!(".{PROJECT_NAME}"))].iter().collect(),
        [Path::new("/"), Path::new("etc"), Path::new(PROJECT_NAME)].iter().collect(),
    ]
}
