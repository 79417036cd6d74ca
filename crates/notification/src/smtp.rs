//! SMTP delivery through lettre with the notifier's security-mode dispatch.

use std::{
    convert::Infallible,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use async_trait::async_trait;
pub use lettre::{transport::smtp::authentication::Credentials, Message};
use lettre::{
    message::{MultiPart, SinglePart},
    transport::smtp::client::{Tls, TlsParameters},
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};

use crate::{Email, Error, NotificationClient};

/// Connection security requested by the property group.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SecurityMode {
    /// `SSL`: implicit TLS.
    Ssl,
    /// `starttls`: plaintext upgraded with STARTTLS.
    StartTls,
    /// Any other value.
    Plain,
}

impl SecurityMode {
    /// The connections tried, in order, for this mode.
    ///
    /// `SSL` is followed by a plaintext attempt on the same host and port.
    /// Against an implicit-TLS port that follow-up fails and is only logged,
    /// the TLS attempt having already delivered the message.
    #[must_use]
    pub const fn connections(self) -> &'static [Connection] {
        match self {
            Self::Ssl => &[Connection::ImplicitTls, Connection::Plaintext],
            Self::StartTls => &[Connection::StartTls],
            Self::Plain => &[Connection::Plaintext],
        }
    }
}

impl FromStr for SecurityMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SSL" => Ok(Self::Ssl),
            "starttls" => Ok(Self::StartTls),
            _ => Ok(Self::Plain),
        }
    }
}

/// One way of opening a session with the SMTP server.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Connection {
    ImplicitTls,
    StartTls,
    Plaintext,
}

impl Display for Connection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImplicitTls => write!(f, "implicit TLS"),
            Self::StartTls => write!(f, "STARTTLS"),
            Self::Plaintext => write!(f, "plaintext"),
        }
    }
}

/// SMTP settings resolved from the property group and the secret store.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: String,
    pub port: u16,
    pub security: SecurityMode,
    /// Present only when the server requires authentication.
    pub credentials: Option<Credentials>,
}

/// Opens one SMTP session and submits one message.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns the classified SMTP failure.
    async fn submit(
        &self,
        connection: Connection,
        credentials: Option<&Credentials>,
        message: &Message,
    ) -> Result<(), Error>;
}

/// Production transport backed by `AsyncSmtpTransport`.
#[derive(Clone, Debug)]
pub struct LettreTransport {
    host: String,
    port: u16,
}

impl LettreTransport {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self { Self { host: host.into(), port } }

    fn unverified_tls(&self) -> Result<TlsParameters, Error> {
        TlsParameters::builder(self.host.clone())
            .dangerous_accept_invalid_certs(true)
            .build()
            .map_err(|err| Error::TlsParameters {
                host: self.host.clone(),
                message: err.to_string(),
            })
    }
}

#[async_trait]
impl Transport for LettreTransport {
    async fn submit(
        &self,
        connection: Connection,
        credentials: Option<&Credentials>,
        message: &Message,
    ) -> Result<(), Error> {
        let builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host).port(self.port);

        let builder = match connection {
            Connection::ImplicitTls => builder.tls(Tls::Wrapper(self.unverified_tls()?)),
            Connection::StartTls => builder.tls(Tls::Required(self.unverified_tls()?)),
            Connection::Plaintext => builder.tls(Tls::None),
        };

        let mut builder = builder;
        if let Some(credentials) = credentials {
            tracing::info!("authentication enabled");
            builder = builder.credentials(credentials.clone());
        }

        let _response = builder
            .build()
            .send(message.clone())
            .await
            .map_err(|err| Error::from_smtp(&err, &self.host, self.port, connection))?;

        Ok(())
    }
}

/// SMTP notification client.
#[derive(Clone)]
pub struct Client<T = LettreTransport> {
    config: Config,
    transport: T,
}

impl Client<LettreTransport> {
    /// Creates a client talking to the configured server.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let transport = LettreTransport::new(config.server.clone(), config.port);
        Self { config, transport }
    }
}

impl<T> Client<T>
where
    T: Transport,
{
    /// Creates a client over an arbitrary transport.
    #[must_use]
    pub const fn with_transport(config: Config, transport: T) -> Self { Self { config, transport } }

    #[must_use]
    pub const fn transport(&self) -> &T { &self.transport }
}

#[async_trait]
impl<T> NotificationClient for Client<T>
where
    T: Transport,
{
    /// Walks the connection plan of the security mode. The first failure
    /// ends the walk; it fails the send only if no earlier attempt delivered.
    async fn send_notification(&self, email: &Email) -> Result<(), Error> {
        let message = build_html_email(email)?;
        let mut delivered = false;

        for &connection in self.config.security.connections() {
            tracing::info!(
                %connection,
                server = %self.config.server,
                port = self.config.port,
                "Opening SMTP session"
            );
            let attempt =
                self.transport.submit(connection, self.config.credentials.as_ref(), &message).await;
            if let Err(error) = attempt {
                if !delivered {
                    return Err(error);
                }
                tracing::warn!(%connection, %error, "{}", error.operator_hint());
                return Ok(());
            }
            delivered = true;
        }

        Ok(())
    }
}

/// Builds a multipart/alternative message with a single HTML part.
///
/// # Errors
///
/// Returns an error if the addresses are invalid or the message cannot be
/// built.
pub fn build_html_email(email: &Email) -> Result<Message, Error> {
    Message::builder()
        .from(email.from.parse().map_err(|err: lettre::address::AddressError| {
            Error::BuildEmail { message: format!("invalid sender `{}`: {err}", email.from) }
        })?)
        .to(email.to.parse().map_err(|err: lettre::address::AddressError| Error::BuildEmail {
            message: format!("invalid recipient `{}`: {err}", email.to),
        })?)
        .subject(email.subject.as_str())
        .multipart(MultiPart::alternative().singlepart(SinglePart::html(email.html.clone())))
        .map_err(|err| Error::BuildEmail { message: err.to_string() })
}
