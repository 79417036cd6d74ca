//! Example: send a test notification through an SMTP relay.
//!
//! # Usage
//!
//! ```bash
//! export SMTP_SERVER=smtp.example.com SMTP_PORT=587 SMTP_SECURITY=starttls
//! export SMTP_USER=relay SMTP_PASSWORD=secret
//! export SMTP_FROM="Cloud Portal <noreply@example.com>" SMTP_TO=me@example.com
//! cargo run --example send_test_email
//! ```

use lettre::transport::smtp::authentication::Credentials;
use notification::{
    smtp::{Client, Config, SecurityMode},
    Email,
};

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let security: SecurityMode =
        env_or("SMTP_SECURITY", "starttls").parse().unwrap_or(SecurityMode::Plain);
    let credentials = std::env::var("SMTP_USER")
        .ok()
        .map(|user| Credentials::new(user, env_or("SMTP_PASSWORD", "")));

    let config = Config {
        server: env_or("SMTP_SERVER", "localhost"),
        port: env_or("SMTP_PORT", "25").parse().unwrap_or(25),
        security,
        credentials,
    };

    let email = Email {
        from: env_or("SMTP_FROM", "noreply@example.com"),
        to: env_or("SMTP_TO", "me@example.com"),
        subject: "TEST - Status of deployment example by Cloud Portal".to_string(),
        html: "<html><body><p>Notifier relay check.</p></body></html>".to_string(),
    };

    let client = Client::new(config);
    if notification::deliver(&client, &email).await {
        tracing::info!("Test email sent");
    }
}
