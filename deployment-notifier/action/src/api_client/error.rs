use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to initialize HTTP client: {source}"))]
    InitializeClient { source: reqwest::Error },

    #[snafu(display("Bearer token is not a valid `Authorization` header value"))]
    InvalidBearerToken,

    #[snafu(display(
        "Connection to the automation API was not made successfully, status code: {status}, \
         content: {body}"
    ))]
    ApiUnreachable { status: reqwest::StatusCode, body: String },

    #[snafu(display("Failed to send request to `{path}`: {source}, location: {location}"))]
    UnexpectedHttpResponse {
        path: String,
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },

    #[snafu(display("Failed to serialize request body for `{path}`: {source}"))]
    SerializeRequest { path: String, source: serde_json::Error },

    #[snafu(display(
        "Failed to deserialize JSON from `{path}`, error: {source}, location: {location}"
    ))]
    DeserializeJsonResponse {
        path: String,
        #[snafu(implicit)]
        location: Location,
        source: serde_json::Error,
    },
}
