use indexmap::IndexMap;
use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;

use crate::{
    error::Result,
    model::{property_keys, PropertyGroup},
};

/// Everything gathered about one deployment, serialized as `depInfoAndRes`.
#[derive(Clone, Debug, Serialize)]
pub struct AggregateRecord {
    #[serde(rename = "proGrpContent")]
    pub property_group: PropertyGroup,

    pub name: String,

    pub description: String,

    pub id: String,

    pub status: String,

    #[serde(rename = "createdAt")]
    pub created_at: String,

    #[serde(rename = "leaseExpireAt")]
    pub lease_expire_at: String,

    #[serde(rename = "createdBy")]
    pub created_by: String,

    #[serde(rename = "ownedBy")]
    pub owned_by: String,

    #[serde(rename = "lastUpdatedAt")]
    pub last_updated_at: String,

    #[serde(rename = "projectName")]
    pub project_name: String,

    #[serde(rename = "lastUpdatedBy")]
    pub last_updated_by: String,

    /// Keyed by resource display name; a later resource with the same name
    /// replaces the earlier one.
    #[serde(rename = "Resources")]
    pub resources: IndexMap<String, ResourceEntry>,

    #[serde(rename = "requestDetails")]
    pub request_details: String,

    #[serde(rename = "requestStatus")]
    pub request_status: String,

    #[serde(rename = "requestorEmail")]
    pub requestor_email: String,

    #[serde(rename = "requestorFirstName")]
    pub requestor_first_name: String,

    /// Set when a lease expiry is reported on behalf of the deployment's
    /// creator.
    #[serde(rename = "requestorName", skip_serializing_if = "Option::is_none")]
    pub requestor_name: Option<String>,
}

impl AggregateRecord {
    pub const NO_DETAILS: &'static str = "No additional details.";
    pub const NO_STATUS: &'static str = "No Status";

    /// `<status> - Status of deployment <name> by <platform name>`
    ///
    /// # Errors
    ///
    /// Returns an error if the property group has no `platform_name`.
    pub fn subject(&self) -> Result<String> {
        let platform_name = self.property_group.required_text(property_keys::PLATFORM_NAME)?;
        Ok(format!("{} - Status of deployment {} by {platform_name}", self.status, self.name))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceEntry {
    pub name: String,

    pub kind: String,

    pub state: String,

    pub started_at: String,

    /// Present for virtual machines only.
    pub machine: Option<MachineDetails>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MachineDetails {
    pub address: Value,

    pub cpu_count: Value,

    pub total_memory_mb: Value,

    pub operating_system: Value,

    pub disks: Vec<DiskEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiskEntry {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Type")]
    pub kind: String,

    #[serde(rename = "Capacity GB")]
    pub capacity_gb: Value,
}

impl Serialize for ResourceEntry {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let machine_fields = self.machine.as_ref().map_or(0, |machine| 4 + machine.disks.len());
        let mut map = serializer.serialize_map(Some(4 + machine_fields))?;
        map.serialize_entry("Name", &self.name)?;
        map.serialize_entry("Type", &self.kind)?;
        map.serialize_entry("State", &self.state)?;
        map.serialize_entry("started At", &self.started_at)?;

        if let Some(machine) = &self.machine {
            map.serialize_entry("IP Address", &machine.address)?;
            map.serialize_entry("CPU count", &machine.cpu_count)?;
            map.serialize_entry("Total Memory MB", &machine.total_memory_mb)?;
            map.serialize_entry("Operating System", &machine.operating_system)?;
            for (index, disk) in machine.disks.iter().enumerate() {
                map.serialize_entry(&format!("disk {index}"), disk)?;
            }
        }

        map.end()
    }
}

/// What the entry point returns to the automation platform.
#[derive(Clone, Debug, Serialize)]
pub struct Outputs {
    #[serde(rename = "depInfoAndRes")]
    pub record: AggregateRecord,

    #[serde(rename = "messageSubject")]
    pub message_subject: String,
}
