use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{EventTopic, EventType};

/// The mapping the automation platform hands to the action.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InvocationInputs {
    #[serde(rename = "orgId")]
    pub org_id: String,

    #[serde(rename = "projectId")]
    pub project_id: String,

    #[serde(rename = "deploymentId")]
    pub deployment_id: String,

    /// Sent verbatim as the `Authorization` header.
    #[serde(rename = "bearerToken")]
    pub bearer_token: String,

    #[serde(rename = "userName")]
    pub user_name: String,

    /// `<provider>:<user id>`.
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Host name of the automation API.
    pub vra_fqdn: String,

    /// Lease-expiry events arrive without an event type.
    #[serde(rename = "eventType", default = "InvocationInputs::default_event_type")]
    pub event_type: String,

    #[serde(rename = "__metadata")]
    pub metadata: EventMetadata,

    #[serde(rename = "actionName", default)]
    pub action_name: Option<String>,

    /// Request id of the deployment request that fired the event.
    pub id: String,

    #[serde(rename = "requestType", default)]
    pub request_type: Option<String>,

    #[serde(rename = "catalogItemId", default)]
    pub catalog_item_id: Option<String>,

    #[serde(rename = "catalogItemVersion", default)]
    pub catalog_item_version: Option<String>,

    #[serde(rename = "requestInputs", default)]
    pub request_inputs: IndexMap<String, serde_json::Value>,

    /// Name of the secret holding the SMTP password.
    pub smtp_password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventMetadata {
    #[serde(rename = "eventTopicId")]
    pub event_topic_id: String,
}

impl InvocationInputs {
    #[inline]
    #[must_use]
    pub fn default_event_type() -> String { EventType::ExpireNotification.as_str().to_string() }

    #[must_use]
    pub fn event_type(&self) -> EventType {
        let Ok(event_type) = self.event_type.parse::<EventType>();
        event_type
    }

    /// The identity-service user id, i.e. the part after the first `:`.
    #[must_use]
    pub fn identity_user_id(&self) -> Option<&str> { self.user_id.split(':').nth(1) }

    #[must_use]
    pub fn event_topic(&self) -> EventTopic {
        let Ok(topic) = self.metadata.event_topic_id.parse::<EventTopic>();
        topic
    }

    #[must_use]
    pub fn is_catalog_request(&self) -> bool { self.request_type.as_deref() == Some("CATALOG") }
}
