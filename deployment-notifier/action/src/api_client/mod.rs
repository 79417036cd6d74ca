mod error;
mod http;

use async_trait::async_trait;
use deployment_notifier_core::model::api::{
    Deployment, DeploymentRequest, Project, PropertyGroupPage, ResourceDetail, UpfrontPrice,
    UpfrontPriceRequest, UpfrontPriceTicket, UserInfo,
};

pub use self::{
    error::{Error, Result},
    http::Client,
};

/// The automation API endpoints the notifier calls.
#[async_trait]
pub trait AutomationApi: Send + Sync {
    /// Connectivity check. Any status other than `200 OK` is an error.
    async fn about(&self) -> Result<()>;

    async fn project(&self, project_id: &str) -> Result<Project>;

    async fn property_groups(&self, name: &str) -> Result<PropertyGroupPage>;

    /// Fetches a deployment, deleted ones included, with its project and
    /// resources expanded.
    async fn deployment(&self, deployment_id: &str) -> Result<Deployment>;

    async fn resource(&self, resource_id: &str) -> Result<ResourceDetail>;

    async fn request(&self, request_id: &str) -> Result<DeploymentRequest>;

    async fn user_info(&self, user_id: &str, org_id: &str) -> Result<UserInfo>;

    async fn request_upfront_price(
        &self,
        catalog_item_id: &str,
        request: &UpfrontPriceRequest,
    ) -> Result<UpfrontPriceTicket>;

    async fn upfront_price(
        &self,
        catalog_item_id: &str,
        upfront_price_id: &str,
    ) -> Result<UpfrontPrice>;
}
