use std::path::PathBuf;

use snafu::Snafu;

use crate::config;

/// Result type alias for the CLI.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for the CLI.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Notifier { source: deployment_notifier_action::Error },

    #[snafu(display("{source}"))]
    Config { source: config::Error },

    #[snafu(display("Could not initialize tokio runtime, error: {source}"))]
    InitializeTokioRuntime { source: std::io::Error },

    #[snafu(display("Could not read invocation inputs from {}, error: {source}", path.display()))]
    ReadInputs { path: PathBuf, source: std::io::Error },

    #[snafu(display("Could not parse invocation inputs from {}, error: {source}", path.display()))]
    ParseInputs { path: PathBuf, source: serde_json::Error },

    #[snafu(display("Could not serialize outputs, error: {source}"))]
    SerializeOutputs { source: serde_json::Error },

    #[snafu(display("Could not serialize default configuration, error: {source}"))]
    SerializeConfig { source: serde_yaml::Error },

    #[snafu(display("Could not write rendered email to {}, error: {source}", path.display()))]
    WriteHtml { path: PathBuf, source: std::io::Error },

    #[snafu(display("Could not write to stdout, error: {source}"))]
    WriteStdout { source: std::io::Error },
}

impl From<config::Error> for Error {
    fn from(source: config::Error) -> Self { Self::Config { source } }
}

impl From<deployment_notifier_action::Error> for Error {
    fn from(source: deployment_notifier_action::Error) -> Self { Self::Notifier { source } }
}

pub trait CommandError {
    fn exit_code(&self) -> exitcode::ExitCode;
}

impl CommandError for Error {
    fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::Notifier { .. }
            | Self::SerializeOutputs { .. }
            | Self::SerializeConfig { .. } => exitcode::SOFTWARE,
            Self::Config { .. } => exitcode::CONFIG,
            Self::ReadInputs { .. } | Self::ParseInputs { .. } => exitcode::DATAERR,
            Self::InitializeTokioRuntime { .. }
            | Self::WriteHtml { .. }
            | Self::WriteStdout { .. } => exitcode::IOERR,
        }
    }
}
