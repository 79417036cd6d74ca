//! HTML bodies of the five notifications.

pub mod html_table;
pub mod requested;

use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use deployment_notifier_core::{
    model::{property_keys, status, AggregateRecord, EventKind},
    time,
};
use indexmap::IndexMap;
use serde_json::Value;
use snafu::ResultExt;

use self::html_table::escape;
use crate::error::{self, Result};

/// Which notification to send, with the data only that notification shows.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// A create request was received; it is either waiting for approval or
    /// already in progress.
    RequestReceived { approval_pending: bool, requested: IndexMap<String, Value> },
    RequestFailed,
    RequestCompleted,
    DeploymentDeleted,
    DeploymentExpired,
}

impl Notification {
    /// Picks the notification for every kind except [`EventKind::RequestReceived`],
    /// whose requested-inputs table has to be assembled by the caller.
    #[must_use]
    pub fn for_record(kind: EventKind, record: &AggregateRecord) -> Option<Self> {
        match kind {
            EventKind::RequestReceived => None,
            // the failed template reports the deployment status, not the request status
            EventKind::RequestFinished if record.status == status::CREATE_FAILED => {
                Some(Self::RequestFailed)
            }
            EventKind::RequestFinished => Some(Self::RequestCompleted),
            EventKind::DeploymentDeleted => Some(Self::DeploymentDeleted),
            EventKind::DeploymentExpired => Some(Self::DeploymentExpired),
        }
    }

    #[must_use]
    pub fn request_received(record: &AggregateRecord, requested: IndexMap<String, Value>) -> Self {
        let approval_pending = record.status == status::APPROVAL_PENDING;
        Self::RequestReceived { approval_pending, requested }
    }
}

/// Fills the notification templates for one invocation.
#[derive(Clone, Debug)]
pub struct Renderer {
    host: String,
    deployment_id: String,
    now: String,
}

impl Renderer {
    /// `now` is shown as the notification time and as the finish or
    /// deletion time.
    #[must_use]
    pub fn new(host: &str, deployment_id: &str, zone: Tz, now: DateTime<Utc>) -> Self {
        Self {
            host: host.to_string(),
            deployment_id: deployment_id.to_string(),
            now: time::local_display(now, zone),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the resources of the record cannot be tabulated.
    pub fn render(&self, notification: &Notification, record: &AggregateRecord) -> Result<String> {
        let name = escape(&record.name);
        let item = |label: &str, value: &str| (label.to_string(), escape(value));

        let (headline, items, section) = match notification {
            Notification::RequestReceived { approval_pending, requested } => {
                let headline = if *approval_pending {
                    request_headline(&name, "is pending for approval.")
                } else {
                    request_headline(&name, "has been received and is in progress.")
                };
                let items = vec![
                    item("Deployment name", &record.name),
                    item("Deployment Description", &record.description),
                    item("Deployment started at", &record.created_at),
                    item("Deployment status", &record.status),
                    item("Deployment details", &record.request_details),
                ];
                let requested = Value::Object(requested.clone().into_iter().collect());
                (headline, items, Some(("Requested Resources:", html_table::convert(&requested))))
            }
            Notification::RequestFailed => {
                let items = vec![
                    item("Deployment name", &record.name),
                    item("Deployment Description", &record.description),
                    item("Deployment started at", &record.created_at),
                    item("Deployment finished at", &self.now),
                    item("Deployment status", &record.status),
                    item("Request details", &record.request_details),
                ];
                (request_headline(&name, "has failed."), items, None)
            }
            Notification::RequestCompleted => {
                let items = vec![
                    item("Deployment name", &record.name),
                    item("Deployment Description", &record.description),
                    item("Deployment started at", &record.created_at),
                    item("Deployment finished at", &self.now),
                    item("Deployment lease expires", &record.lease_expire_at),
                    item("Deployment status", &record.status),
                    item("Request details", &record.request_details),
                ];
                let resources =
                    serde_json::to_value(&record.resources).context(error::TabulateResourcesSnafu)?;
                (
                    request_headline(&name, "has been completed."),
                    items,
                    Some(("Resources Details:", html_table::convert(&resources))),
                )
            }
            Notification::DeploymentDeleted => {
                let items = vec![
                    item("Deployment name", &record.name),
                    item("Deployment Description", &record.description),
                    item("Deployment created at", &record.created_at),
                    item("Deployment deleted at", &self.now),
                    item("Deployment status", &record.status),
                ];
                (
                    format!(
                        "Your request to delete the deployment <strong>{name}</strong> has been \
                         completed."
                    ),
                    items,
                    None,
                )
            }
            Notification::DeploymentExpired => {
                tracing::info!(deployment = %record.name, "Your deployment has expired");
                let items = vec![
                    item("Deployment name", &record.name),
                    item("Deployment Description", &record.description),
                    item("Deployment created at", &record.created_at),
                    item("Deployment lease expires", &record.lease_expire_at),
                ];
                (format!("Your deployment <strong>{name}</strong> has expired."), items, None)
            }
        };

        let mut html = String::new();
        self.write_page(&mut html, record, &headline, &items, section)
            .context(error::FormatPageSnafu)?;
        Ok(html)
    }

    fn write_page(
        &self,
        html: &mut String,
        record: &AggregateRecord,
        headline: &str,
        items: &[(String, String)],
        section: Option<(&str, String)>,
    ) -> fmt::Result {
        let group = &record.property_group;
        html.push_str("<html>\n<body>\n");

        html.push_str(&style(
            &escape(&group.text_or_blank(property_keys::LOGO_WIDTH_PIXELS)),
            &escape(&group.text_or_blank(property_keys::LOGO_HEIGHT_PIXELS)),
        ));
        write!(
            html,
            "<div class=\"container\">\n<img src=\"data:image/png;base64, {}\" alt=\"Image\" \
             />\n</div>\n<br>\n",
            escape(&group.text_or_blank(property_keys::LOGO))
        )?;
        writeln!(html, "<p><strong>Date and Time:</strong> {}<br></p>", self.now)?;
        writeln!(html, "<p>Hello <strong> {},</strong></p>", escape(&record.requestor_first_name))?;
        writeln!(html, "<p>{headline}</p>")?;

        html.push_str(
            "<table>\n<tr>\n<td>\n<h2><strong>Deployment Information:</strong></h2>\n<ul>\n",
        );
        for (label, value) in items {
            writeln!(html, "<li> {label}: <strong> {value} </strong></li>")?;
        }
        html.push_str("</ul>\n</td>\n</tr>\n</table>\n");

        if let Some((heading, table)) = section {
            writeln!(
                html,
                "<table>\n<tr>\n<td>\n<h2><strong>{heading}</strong></h2>\n{table}\n</td>\n</tr>\n\
                 </table>"
            )?;
        }

        html.push_str(&self.footer());
        html.push_str("</body>\n</html>\n");
        Ok(())
    }

    /// Link to the deployment in the automation UI.
    #[must_use]
    pub fn deployment_link(&self) -> String {
        format!(
            "https://{}/automation-ui/#/deployment-ui;ash=%2Fworkload%2Fdeployment%2F{}",
            self.host, self.deployment_id
        )
    }

    fn footer(&self) -> String {
        format!(
            "<table>\n<tr>\n<td>\n<a href=\"{}\">Click here to see your request</a>\n</td>\n\
             </tr>\n</table>\n",
            escape(&self.deployment_link())
        )
    }
}

fn request_headline(escaped_name: &str, outcome: &str) -> String {
    format!("Your request for deployment <strong>{escaped_name}</strong> {outcome}")
}

fn style(logo_width: &str, logo_height: &str) -> String {
    format!(
        r"<style>
table {{
    width: 100%;
    border: 1px solid black;
    border-radius: 20px;
}}
td {{
    text-align: left;
    padding: 8px;
    border: 1px solid black;
    background-color: #F7F9F9;
    border-radius: 10px;
}}
th {{
    text-align: left;
    padding: 8px;
    border: 1px solid black;
    background-color: #EBF5FB;
    border-radius: 10px;
}}
tr {{
    background-color: #FDFEFE;
}}
.container {{
    width: {logo_width}px;
    height: {logo_height}px;
}}
img {{
    width: 100%;
    height: 100%;
    object-fit: cover;
}}
</style>
"
    )
}
