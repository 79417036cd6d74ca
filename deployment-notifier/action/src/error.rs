use snafu::Snafu;

use crate::api_client;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    AutomationApi { source: api_client::Error },

    #[snafu(display("{source}"))]
    Core { source: deployment_notifier_core::Error },

    #[snafu(display("Unrecognized event type! (`{event_type}` on `{event_topic}`)"))]
    UnrecognizedEvent { event_type: String, event_topic: String },

    #[snafu(display("Project `{project_id}` has no property group named `{name}`"))]
    PropertyGroupNotFound { project_id: String, name: String },

    #[snafu(display("User id `{user_id}` is not of the form `<provider>:<id>`"))]
    MalformedUserId { user_id: String },

    #[snafu(display("Response of `{operation}` has no `{field}`"))]
    MissingField { operation: &'static str, field: &'static str },

    #[snafu(display("Invocation inputs have no `{field}`"))]
    MissingInput { field: &'static str },

    #[snafu(display("Gave up waiting for {what} after {attempts} follow-up requests"))]
    PollingExhausted { what: &'static str, attempts: u32 },

    #[snafu(display("Failed to tabulate deployment resources: {source}"))]
    TabulateResources { source: serde_json::Error },

    #[snafu(display("Failed to format the notification page: {source}"))]
    FormatPage { source: std::fmt::Error },

    #[snafu(display("Failed to read secret `{name}`: {message}"))]
    Secret { name: String, message: String },
}

impl From<api_client::Error> for Error {
    fn from(source: api_client::Error) -> Self { Self::AutomationApi { source } }
}

impl From<deployment_notifier_core::Error> for Error {
    fn from(source: deployment_notifier_core::Error) -> Self { Self::Core { source } }
}
