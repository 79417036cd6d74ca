use deployment_notifier_core::model::{property_keys, PropertyGroup};
use notification::{
    smtp::{self, Credentials, SecurityMode},
    Email, NotificationClient,
};

use crate::{error::Result, secret::SecretProvider};

/// Opens notification clients for resolved SMTP settings.
pub trait Mailer: Send + Sync {
    fn connect(&self, config: smtp::Config) -> Box<dyn NotificationClient>;
}

/// Mails through a real SMTP server.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmtpMailer;

impl Mailer for SmtpMailer {
    fn connect(&self, config: smtp::Config) -> Box<dyn NotificationClient> {
        Box::new(smtp::Client::new(config))
    }
}

/// Reads the SMTP entries of `group` and resolves the password secret.
///
/// # Errors
///
/// Returns an error if an SMTP entry is missing or malformed, or the secret
/// cannot be read.
pub async fn smtp_config(
    group: &PropertyGroup,
    secrets: &dyn SecretProvider,
    password_secret: &str,
) -> Result<smtp::Config> {
    let server = group.required_text(property_keys::SMTP_SERVER)?;
    let port = group.smtp_port()?;
    let user = group.required_text(property_keys::SMTP_USER)?;
    let authenticated = group.flag(property_keys::SMTP_AUTHENTICATED)?;
    let Ok(security) =
        group.required_text(property_keys::SMTP_CONNECTION_SECURITY)?.parse::<SecurityMode>();
    let password = secrets.secret(password_secret).await?;

    let credentials = authenticated.then(|| Credentials::new(user, password));
    Ok(smtp::Config { server, port, security, credentials })
}

/// Sends `email`; failures are logged and reported as `false`.
pub async fn send(mailer: &dyn Mailer, config: smtp::Config, email: &Email) -> bool {
    tracing::info!(
        server = %config.server,
        port = config.port,
        security = ?config.security,
        "Mailing notification"
    );
    let client = mailer.connect(config);
    notification::deliver(&*client, email).await
}
