//! The deployment notification action: gathers a deployment's data from the
//! automation API, renders the matching notification and mails it to the
//! requestor.

pub mod aggregate;
pub mod api_client;
mod error;
pub mod estimate;
pub mod mail;
mod poller;
pub mod render;
pub mod secret;

use chrono::{DateTime, Utc};
use deployment_notifier_core::{
    config::Config,
    model::{property_keys, AggregateRecord, EventKind, InvocationInputs, Outputs},
};
use notification::Email;
use serde_json::Value;

pub use self::{
    api_client::AutomationApi,
    error::{Error, Result},
    mail::{Mailer, SmtpMailer},
    secret::{SecretProvider, StaticSecrets},
};
use crate::render::{requested, Notification, Renderer};

/// How one invocation is carried out.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    pub config: Config,

    /// Aggregate and render, but do not mail.
    pub dry_run: bool,
}

/// Everything one invocation produced.
#[derive(Clone, Debug)]
pub struct Report {
    pub outputs: Outputs,

    pub email: Email,

    /// `None` when nothing was mailed because of a dry run.
    pub delivered: Option<bool>,
}

/// Entry point of the action.
///
/// # Errors
///
/// Returns an error if the event is not one the notifier handles, the
/// automation API is unreachable or answers with unusable data, or the
/// property group lacks a required entry. Mail delivery failures are logged
/// and do not fail the invocation.
pub async fn handle(
    api: &dyn AutomationApi,
    secrets: &dyn SecretProvider,
    mailer: &dyn Mailer,
    inputs: &InvocationInputs,
    settings: &Settings,
) -> Result<Outputs> {
    let report = process(api, secrets, mailer, inputs, settings, Utc::now()).await?;
    Ok(report.outputs)
}

/// Same as [`handle`], with the notification time given by the caller and
/// the rendered email returned alongside the outputs.
///
/// # Errors
///
/// See [`handle`].
pub async fn process(
    api: &dyn AutomationApi,
    secrets: &dyn SecretProvider,
    mailer: &dyn Mailer,
    inputs: &InvocationInputs,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Result<Report> {
    let event_type = inputs.event_type();
    let event_topic = inputs.event_topic();
    let kind = EventKind::classify(&event_type, &event_topic).ok_or_else(|| {
        Error::UnrecognizedEvent {
            event_type: event_type.to_string(),
            event_topic: event_topic.to_string(),
        }
    })?;
    tracing::info!(
        %event_type,
        %event_topic,
        ?kind,
        deployment_id = %inputs.deployment_id,
        "Handling deployment event"
    );

    let record = aggregate::collect(api, inputs, kind, settings.config.polling.approval).await?;

    let notification = match Notification::for_record(kind, &record) {
        Some(notification) => notification,
        None => request_received(api, inputs, &record, &settings.config).await?,
    };

    let zone = record.property_group.time_zone()?;
    let html = Renderer::new(&inputs.vra_fqdn, &inputs.deployment_id, zone, now)
        .render(&notification, &record)?;
    let subject = record.subject()?;

    let email = Email {
        from: record.property_group.required_text(property_keys::SENDER_EMAIL)?,
        to: record.requestor_email.clone(),
        subject: subject.clone(),
        html,
    };

    let delivered = if settings.dry_run {
        tracing::info!(to = %email.to, "Dry run, not sending the notification");
        None
    } else {
        let config =
            mail::smtp_config(&record.property_group, secrets, &inputs.smtp_password).await?;
        Some(mail::send(mailer, config, &email).await)
    };

    Ok(Report { outputs: Outputs { record, message_subject: subject }, email, delivered })
}

async fn request_received(
    api: &dyn AutomationApi,
    inputs: &InvocationInputs,
    record: &AggregateRecord,
    config: &Config,
) -> Result<Notification> {
    let custom_properties = record.property_group.custom_property_display()?;
    let mut requested = requested::summarize(&inputs.request_inputs, &custom_properties);

    if inputs.is_catalog_request() {
        let price =
            estimate::daily_price(api, inputs, &record.name, config.polling.upfront_price).await?;
        let _replaced = requested.insert(
            requested::DAILY_PRICE_ESTIMATE.to_string(),
            Value::String(requested::format_price(&config.render.price_currency, price)),
        );
    }

    Ok(Notification::request_received(record, requested))
}
