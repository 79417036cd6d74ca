//! Collects everything a notification shows from the automation API.

use chrono_tz::Tz;
use deployment_notifier_core::{
    model::{
        api::{DeploymentRequest, Resource},
        status, AggregateRecord, DiskEntry, EventKind, InvocationInputs, MachineDetails,
        PropertyGroup, ResourceEntry,
    },
    poll::PollPolicy,
    time,
};
use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    api_client::AutomationApi,
    error::{Error, Result},
    poller::Poller,
};

/// Attribute value used when the deployment omits it.
const BLANK: &str = " ";

/// A create request is past the approval stage once this many tasks are done.
const APPROVAL_TASK_THRESHOLD: u32 = 4;

const SYSTEM_USER: &str = "system-user";
const EXPIRE_ACTION: &str = "Expire";

/// Runs the fixed sequence of API calls for one invocation.
///
/// # Errors
///
/// Returns an error if the API is unreachable, a response lacks what the
/// notification needs, or the approval wait runs out of attempts.
pub async fn collect(
    api: &dyn AutomationApi,
    inputs: &InvocationInputs,
    kind: EventKind,
    approval_policy: PollPolicy,
) -> Result<AggregateRecord> {
    api.about().await?;

    let property_group = fetch_property_group(api, &inputs.project_id).await?;
    let zone = property_group.time_zone()?;

    tracing::info!("Discovering deployment info and resources...");
    let deployment = api.deployment(&inputs.deployment_id).await?;

    let created_at = time::to_local_display(&deployment.created_at, zone)?;
    let last_updated_at = time::to_local_display(&deployment.last_updated_at, zone)?;
    let lease_expire_at =
        time::to_local_display_or_empty(deployment.lease_expire_at.as_deref(), zone)?;

    let mut resources = IndexMap::with_capacity(deployment.resources.len());
    for resource in &deployment.resources {
        let entry = describe_resource(api, resource, zone).await?;
        let _replaced = resources.insert(entry.name.clone(), entry);
    }

    let or_blank = |value: Option<String>| value.unwrap_or_else(|| BLANK.to_string());
    let mut record = AggregateRecord {
        property_group,
        name: or_blank(deployment.name),
        description: or_blank(deployment.description),
        id: or_blank(deployment.id),
        status: or_blank(deployment.status),
        created_at,
        lease_expire_at,
        created_by: or_blank(deployment.created_by),
        owned_by: or_blank(deployment.owned_by),
        last_updated_at,
        project_name: or_blank(deployment.project.name),
        last_updated_by: or_blank(deployment.last_updated_by),
        resources,
        request_details: String::new(),
        request_status: String::new(),
        requestor_email: String::new(),
        requestor_first_name: String::new(),
        requestor_name: None,
    };

    let request = api.request(&inputs.id).await?;
    let request = if kind == EventKind::RequestReceived {
        wait_for_approval_stage(api, &inputs.id, request, &mut record, approval_policy).await?
    } else {
        request
    };

    record.request_details = request
        .details
        .filter(|details| !details.is_empty())
        .unwrap_or_else(|| AggregateRecord::NO_DETAILS.to_string());
    record.request_status =
        request.status.unwrap_or_else(|| AggregateRecord::NO_STATUS.to_string());

    if inputs.user_name == SYSTEM_USER && inputs.action_name.as_deref() == Some(EXPIRE_ACTION) {
        tracing::info!(deployment = %record.name, "Lease expired, notifying the creator");
        record.requestor_name = Some(record.created_by.clone());
        record.status = status::LEASE_EXPIRED.to_string();
    }

    tracing::info!("Discovering requestor's email...");
    let user_id = inputs
        .identity_user_id()
        .ok_or_else(|| Error::MalformedUserId { user_id: inputs.user_id.clone() })?;
    let user_info = api.user_info(user_id, &inputs.org_id).await?;
    record.requestor_email = user_info.user.email;
    record.requestor_first_name = user_info.user.first_name;

    Ok(record)
}

async fn fetch_property_group(api: &dyn AutomationApi, project_id: &str) -> Result<PropertyGroup> {
    tracing::info!("Querying API to get property group name...");
    let name = api.project(project_id).await?.properties.property_group;

    tracing::info!(property_group = %name, "Getting inputs from property group...");
    api.property_groups(&name)
        .await?
        .content
        .into_iter()
        .next()
        .map(|definition| definition.properties)
        .ok_or_else(|| Error::PropertyGroupNotFound { project_id: project_id.to_string(), name })
}

async fn describe_resource(
    api: &dyn AutomationApi,
    resource: &Resource,
    zone: Tz,
) -> Result<ResourceEntry> {
    let name = resource
        .display_name()
        .ok_or(Error::MissingField { operation: "deployment", field: "resourceName" })?
        .to_string();

    let machine = if resource.is_virtual_machine() {
        let properties = api.resource(&resource.id).await?.properties;
        let or_empty = |value: Option<Value>| value.unwrap_or_else(|| Value::String(String::new()));
        Some(MachineDetails {
            address: or_empty(properties.address),
            cpu_count: or_empty(properties.cpu_count),
            total_memory_mb: or_empty(properties.total_memory_mb),
            operating_system: or_empty(properties.software_name),
            disks: properties
                .storage
                .disks
                .unwrap_or_default()
                .into_iter()
                .map(|disk| DiskEntry {
                    name: disk.name,
                    kind: disk.kind,
                    capacity_gb: disk.capacity_gb,
                })
                .collect(),
        })
    } else {
        None
    };

    Ok(ResourceEntry {
        name,
        kind: resource.kind.clone(),
        state: resource.state.clone(),
        started_at: time::to_local_display(&resource.created_at, zone)?,
        machine,
    })
}

/// Re-reads the request until it either reports a pending approval or has
/// moved past the approval stage.
async fn wait_for_approval_stage(
    api: &dyn AutomationApi,
    request_id: &str,
    mut request: DeploymentRequest,
    record: &mut AggregateRecord,
    policy: PollPolicy,
) -> Result<DeploymentRequest> {
    tracing::info!("Checking if approval is required...");
    let mut poller = Poller::new(policy, "the approval stage");

    loop {
        let completed_tasks = request
            .completed_tasks
            .ok_or(Error::MissingField { operation: "request", field: "completedTasks" })?;
        if completed_tasks >= APPROVAL_TASK_THRESHOLD {
            return Ok(request);
        }

        if request.status.as_deref() == Some(status::APPROVAL_PENDING) {
            tracing::info!("Approval is required...");
            record.status = status::APPROVAL_PENDING.to_string();
            return Ok(request);
        }

        poller.next_attempt().await?;
        request = api.request(request_id).await?;
    }
}

