use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Property group does not define `{key}`"))]
    MissingProperty { key: String },

    #[snafu(display("Property group value of `{key}` is not usable: {value}"))]
    InvalidProperty { key: String, value: String },

    #[snafu(display("Unknown time zone `{name}`: {message}"))]
    UnknownTimeZone { name: String, message: String },

    #[snafu(display("Invalid timestamp `{value}`, error: {source}"))]
    InvalidTimestamp { value: String, source: chrono::ParseError },
}
