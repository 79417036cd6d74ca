use std::io;

use snafu::Snafu;

use crate::smtp::Connection;

/// Errors that can occur in the notification crate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Sender or recipient is not a valid mailbox, or the message could not
    /// be assembled.
    #[snafu(display("Failed to build email message: {message}"))]
    BuildEmail { message: String },

    /// TLS parameters for the SMTP server could not be built.
    #[snafu(display("Failed to prepare TLS for {host}: {message}"))]
    TlsParameters { host: String, message: String },

    /// The SMTP server could not be reached.
    #[snafu(display("Failed to connect to {host}:{port} over {connection}: {message}"))]
    Connect { host: String, port: u16, connection: Connection, message: String },

    /// The server dropped the connection mid-conversation.
    #[snafu(display("SMTP server disconnected unexpectedly: {message}"))]
    Disconnected { message: String },

    /// The server rejected the credentials.
    #[snafu(display("SMTP authentication error: {message}"))]
    Authentication { message: String },

    /// The server refused the sender or a recipient.
    #[snafu(display("SMTP server refused the envelope ({code}): {message}"))]
    Refused { code: String, message: String },

    /// Any other SMTP protocol failure.
    #[snafu(display("SMTP error occurred: {message}"))]
    Protocol { message: String },
}

impl Error {
    /// Classifies a transport error the way an operator reads it.
    #[must_use]
    pub fn from_smtp(
        err: &lettre::transport::smtp::Error,
        host: &str,
        port: u16,
        connection: Connection,
    ) -> Self {
        let message = err.to_string();

        if let Some(code) = err.status() {
            let code_text = code.to_string();
            return match code_text.as_str() {
                "530" | "534" | "535" | "538" => Self::Authentication { message },
                _ if err.is_permanent() => Self::Refused { code: code_text, message },
                _ => Self::Protocol { message },
            };
        }

        if err.is_timeout() {
            return Self::Connect { host: host.to_string(), port, connection, message };
        }

        match io_error_kind(err) {
            Some(
                io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof,
            ) => Self::Disconnected { message },
            Some(_) => Self::Connect { host: host.to_string(), port, connection, message },
            None if err.is_client() => Self::Protocol { message },
            None => Self::Connect { host: host.to_string(), port, connection, message },
        }
    }

    /// The line written to the log when delivery is abandoned.
    #[must_use]
    pub fn operator_hint(&self) -> &'static str {
        match self {
            Self::Connect { .. } | Self::TlsParameters { .. } => {
                "Failed to connect to the server. Bad connection settings?"
            }
            Self::Disconnected { .. } => "Failed to connect to the server. Wrong user/password?",
            Self::Authentication { .. } => "SMTP Authentication error",
            Self::Refused { .. } => "Sender or recipient address refused",
            Self::Protocol { .. } => "SMTP error occurred",
            Self::BuildEmail { .. } => "Email message could not be built",
        }
    }
}

fn io_error_kind(err: &lettre::transport::smtp::Error) -> Option<io::ErrorKind> {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io_err) = inner.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = inner.source();
    }
    None
}
