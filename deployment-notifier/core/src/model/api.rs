//! Payloads exchanged with the automation API. Only the fields the notifier
//! reads are modelled; everything else in a response is ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::model::PropertyGroup;

pub const NSX_NETWORK_TYPE: &str = "Cloud.NSX.Network";
pub const VSPHERE_MACHINE_TYPE: &str = "Cloud.vSphere.Machine";

#[derive(Clone, Debug, Deserialize)]
pub struct Project {
    pub properties: ProjectProperties,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProjectProperties {
    #[serde(rename = "propertyGroup")]
    pub property_group: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PropertyGroupPage {
    #[serde(default)]
    pub content: Vec<PropertyGroupDefinition>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PropertyGroupDefinition {
    pub properties: PropertyGroup,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    pub created_at: String,

    pub last_updated_at: String,

    #[serde(default)]
    pub lease_expire_at: Option<String>,

    #[serde(default)]
    pub created_by: Option<String>,

    #[serde(default)]
    pub owned_by: Option<String>,

    #[serde(default)]
    pub last_updated_by: Option<String>,

    pub project: DeploymentProject,

    pub resources: Vec<Resource>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DeploymentProject {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub state: String,

    pub created_at: String,

    #[serde(default)]
    pub properties: ResourceProperties,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResourceProperties {
    #[serde(rename = "resourceName", default)]
    pub resource_name: Option<String>,
}

impl Resource {
    /// Name shown in notifications: NSX networks use their own name, every
    /// other resource its provider-side `resourceName`.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        if self.kind == NSX_NETWORK_TYPE {
            Some(&self.name)
        } else {
            self.properties.resource_name.as_deref()
        }
    }

    #[must_use]
    pub fn is_virtual_machine(&self) -> bool { self.kind == VSPHERE_MACHINE_TYPE }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ResourceDetail {
    pub properties: MachineProperties,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineProperties {
    #[serde(default)]
    pub address: Option<serde_json::Value>,

    #[serde(default)]
    pub cpu_count: Option<serde_json::Value>,

    #[serde(rename = "totalMemoryMB", default)]
    pub total_memory_mb: Option<serde_json::Value>,

    #[serde(default)]
    pub software_name: Option<serde_json::Value>,

    #[serde(default)]
    pub storage: Storage,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Storage {
    #[serde(default)]
    pub disks: Option<Vec<Disk>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub capacity_gb: serde_json::Value,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    /// Reported as a number or a numeric string depending on the API build.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub completed_tasks: Option<u32>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserInfo {
    pub user: User,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,

    pub first_name: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpfrontPriceRequest {
    pub bulk_request_count: String,

    pub deployment_name: String,

    pub inputs: IndexMap<String, serde_json::Value>,

    pub project_id: String,

    pub version: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpfrontPriceTicket {
    pub upfront_price_id: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpfrontPrice {
    pub status: String,

    #[serde(default)]
    pub daily_total_price: Option<f64>,
}

impl UpfrontPrice {
    pub const SUCCESS: &'static str = "SUCCESS";

    #[must_use]
    pub fn is_ready(&self) -> bool { self.status == Self::SUCCESS }
}
