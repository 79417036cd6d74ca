#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use deployment_notifier_action::{
    api_client::{self, AutomationApi},
    Mailer, StaticSecrets,
};
use deployment_notifier_core::model::{
    api::{
        Deployment, DeploymentRequest, Project, PropertyGroupPage, ResourceDetail, UpfrontPrice,
        UpfrontPriceRequest, UpfrontPriceTicket, UserInfo,
    },
    InvocationInputs,
};
use notification::{
    smtp::{self, Connection, Credentials, Message},
    NotificationClient,
};
use serde_json::{json, Value};

pub const HOST: &str = "vra.example.com";
pub const SMTP_SECRET: &str = "smtp-password-ref";

/// 2021-12-23 12:00:00 in Asia/Dubai.
pub fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2021, 12, 23, 8, 0, 0).unwrap() }

pub fn inputs(event_type: Option<&str>, topic: &str) -> InvocationInputs {
    let mut inputs = json!({
        "orgId": "org-1",
        "projectId": "proj-1",
        "deploymentId": "dep-1",
        "bearerToken": "Bearer abc",
        "userName": "jane",
        "userId": "vmware:8c2f",
        "vra_fqdn": HOST,
        "__metadata": { "eventTopicId": topic },
        "actionName": "Create",
        "id": "req-1",
        "requestType": "DEPLOYMENT",
        "requestInputs": {
            "nodeSize": "medium",
            "nodeCount": 2,
            "operatingSystem": "Ubuntu 20.04,ubuntu-template",
            "costCenter": "CC-42"
        },
        "smtp_password": SMTP_SECRET,
    });
    if let Some(event_type) = event_type {
        inputs["eventType"] = json!(event_type);
    }
    serde_json::from_value(inputs).unwrap()
}

pub fn property_group() -> Value {
    json!({
        "timeZone": { "const": "Asia/Dubai" },
        "platform_name": { "const": "Cloud Portal" },
        "logo": { "const": "aGVsbG8=" },
        "logo_company_width_pixels": { "const": 120 },
        "logo_company_height_pixels": { "const": 40 },
        "smtp_server": { "const": "smtp.example.com" },
        "smtp_port": { "const": 465 },
        "smtp_user": { "const": "relay" },
        "sender_email": { "const": "noreply@example.com" },
        "smtp_authenticated": { "const": false },
        "smtp_connection_security": { "const": "SSL" },
        "custom_property_display": { "const": ["costCenter"] },
    })
}

pub fn deployment(status: &str, resources: Value) -> Value {
    json!({
        "id": "dep-1",
        "name": "web-01",
        "description": "Front end",
        "status": status,
        "createdAt": "2021-12-22T10:15:30.123456Z",
        "lastUpdatedAt": "2021-12-22T10:45:00.000Z",
        "leaseExpireAt": "2022-01-22T10:15:30Z",
        "createdBy": "jane",
        "ownedBy": "jane",
        "lastUpdatedBy": "jane",
        "project": { "name": "Platform" },
        "resources": resources,
    })
}

pub fn request(completed_tasks: u32, status: &str) -> Value {
    json!({ "completedTasks": completed_tasks, "status": status, "details": "" })
}

/// Automation API answering from fixtures and recording every call.
pub struct FakeApi {
    pub reachable: bool,
    pub property_group: Value,
    pub deployment: Value,
    pub resources: HashMap<String, Value>,
    /// Answers to successive request lookups; the last one repeats.
    pub requests: Mutex<VecDeque<Value>>,
    /// Answers to successive upfront price lookups; the last one repeats.
    pub prices: Mutex<VecDeque<Value>>,
    pub price_requests: Mutex<Vec<UpfrontPriceRequest>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new(deployment: Value) -> Self {
        Self {
            reachable: true,
            property_group: property_group(),
            deployment,
            resources: HashMap::new(),
            requests: Mutex::new(VecDeque::from([request(6, "SUCCESSFUL")])),
            prices: Mutex::new(VecDeque::new()),
            price_requests: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|recorded| recorded.as_str() == call).count()
    }

    fn record(&self, call: impl Into<String>) { self.calls.lock().unwrap().push(call.into()); }

    fn next(queue: &Mutex<VecDeque<Value>>) -> Value {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

fn parse<T>(value: Value) -> T
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value).unwrap()
}

#[async_trait]
impl AutomationApi for FakeApi {
    async fn about(&self) -> api_client::Result<()> {
        self.record("about");
        if self.reachable {
            Ok(())
        } else {
            Err(api_client::Error::ApiUnreachable {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "maintenance".to_string(),
            })
        }
    }

    async fn project(&self, project_id: &str) -> api_client::Result<Project> {
        self.record(format!("project {project_id}"));
        Ok(parse(json!({ "properties": { "propertyGroup": "notifications" } })))
    }

    async fn property_groups(&self, name: &str) -> api_client::Result<PropertyGroupPage> {
        self.record(format!("property-groups {name}"));
        Ok(parse(json!({ "content": [{ "properties": self.property_group }] })))
    }

    async fn deployment(&self, deployment_id: &str) -> api_client::Result<Deployment> {
        self.record(format!("deployment {deployment_id}"));
        Ok(parse(self.deployment.clone()))
    }

    async fn resource(&self, resource_id: &str) -> api_client::Result<ResourceDetail> {
        self.record(format!("resource {resource_id}"));
        Ok(parse(self.resources[resource_id].clone()))
    }

    async fn request(&self, request_id: &str) -> api_client::Result<DeploymentRequest> {
        self.record(format!("request {request_id}"));
        Ok(parse(Self::next(&self.requests)))
    }

    async fn user_info(&self, user_id: &str, org_id: &str) -> api_client::Result<UserInfo> {
        self.record(format!("user {user_id} {org_id}"));
        Ok(parse(json!({ "user": { "email": "jane@example.com", "firstName": "Jane" } })))
    }

    async fn request_upfront_price(
        &self,
        catalog_item_id: &str,
        request: &UpfrontPriceRequest,
    ) -> api_client::Result<UpfrontPriceTicket> {
        self.record(format!("request-upfront-price {catalog_item_id}"));
        self.price_requests.lock().unwrap().push(request.clone());
        Ok(parse(json!({ "upfrontPriceId": "price-1" })))
    }

    async fn upfront_price(
        &self,
        catalog_item_id: &str,
        upfront_price_id: &str,
    ) -> api_client::Result<UpfrontPrice> {
        self.record(format!("upfront-price {catalog_item_id} {upfront_price_id}"));
        Ok(parse(Self::next(&self.prices)))
    }
}

pub fn secrets() -> StaticSecrets {
    StaticSecrets::new(HashMap::from([(SMTP_SECRET.to_string(), "hunter2".to_string())]))
}

/// Mailer whose SMTP sessions are recorded instead of opened.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    servers: Arc<Mutex<Vec<(String, u16)>>>,
    attempts: Arc<Mutex<Vec<(Connection, bool)>>>,
    messages: Arc<Mutex<Vec<String>>>,
    fail_with: Arc<Mutex<Option<notification::Error>>>,
    /// Fails only sessions over this connection; `None` fails the first one.
    fail_on: Option<Connection>,
}

impl RecordingMailer {
    pub fn failing(error: notification::Error) -> Self {
        let mailer = Self::default();
        *mailer.fail_with.lock().unwrap() = Some(error);
        mailer
    }

    pub fn failing_on(connection: Connection, error: notification::Error) -> Self {
        Self { fail_on: Some(connection), ..Self::failing(error) }
    }

    pub fn servers(&self) -> Vec<(String, u16)> { self.servers.lock().unwrap().clone() }

    pub fn attempts(&self) -> Vec<(Connection, bool)> { self.attempts.lock().unwrap().clone() }

    pub fn messages(&self) -> Vec<String> { self.messages.lock().unwrap().clone() }
}

impl Mailer for RecordingMailer {
    fn connect(&self, config: smtp::Config) -> Box<dyn NotificationClient> {
        self.servers.lock().unwrap().push((config.server.clone(), config.port));
        Box::new(smtp::Client::with_transport(config, self.clone()))
    }
}

#[async_trait]
impl smtp::Transport for RecordingMailer {
    async fn submit(
        &self,
        connection: Connection,
        credentials: Option<&Credentials>,
        message: &Message,
    ) -> Result<(), notification::Error> {
        self.attempts.lock().unwrap().push((connection, credentials.is_some()));
        self.messages.lock().unwrap().push(String::from_utf8_lossy(&message.formatted()).into());
        if self.fail_on.is_some_and(|target| target != connection) {
            return Ok(());
        }
        match self.fail_with.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
