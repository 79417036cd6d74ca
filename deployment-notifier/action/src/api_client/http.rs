use async_trait::async_trait;
use deployment_notifier_core::{
    config::ApiConfig,
    model::api::{
        Deployment, DeploymentRequest, Project, PropertyGroupPage, ResourceDetail, UpfrontPrice,
        UpfrontPriceRequest, UpfrontPriceTicket, UserInfo,
    },
};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Method, StatusCode,
};
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::api_client::{
    error::{self, Error, Result},
    AutomationApi,
};

/// `reqwest` based client for one automation API host.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_version: String,
}

impl Client {
    /// Creates a client for `host`, sending `bearer_token` verbatim as the
    /// `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: &ApiConfig, host: &str, bearer_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let _unused = headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let _unused =
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut authorization =
            HeaderValue::from_str(bearer_token).map_err(|_| Error::InvalidBearerToken)?;
        authorization.set_sensitive(true);
        let _unused = headers.insert(header::AUTHORIZATION, authorization);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .context(error::InitializeClientSnafu)?;

        Ok(Self::with_http_client(http, config, host))
    }

    /// Creates a client over a preconfigured HTTP client.
    #[must_use]
    pub fn with_http_client(http: reqwest::Client, config: &ApiConfig, host: &str) -> Self {
        Self {
            http,
            base_url: format!("{}://{host}", config.scheme),
            api_version: config.api_version.clone(),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<(StatusCode, String)> {
        let url = format!("{}{path}", self.base_url);

        let mut request_builder = self
            .http
            .request(method, url)
            .query(&[("apiVersion", self.api_version.as_str())])
            .query(params);
        if let Some(body) = body {
            request_builder = request_builder.body(body);
        }

        let response = request_builder
            .send()
            .await
            .with_context(|_| error::UnexpectedHttpResponseSnafu { path: path.to_string() })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|_| error::UnexpectedHttpResponseSnafu { path: path.to_string() })?;

        Ok((status, text))
    }

    /// Non-success responses are logged and still parsed; a body that does
    /// not match `T` is the error the caller sees.
    async fn call<T>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let (status, text) = self.send(method, path, params, body).await?;
        if status != StatusCode::OK {
            tracing::warn!(%status, path, "Unexpected response from the automation API: {text}");
        }

        serde_json::from_str(&text)
            .with_context(|_| error::DeserializeJsonResponseSnafu { path: path.to_string() })
    }

    async fn get<T>(&self, path: &str, params: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.call(Method::GET, path, params, None).await
    }
}

#[async_trait]
impl AutomationApi for Client {
    async fn about(&self) -> Result<()> {
        tracing::info!("Testing automation API connection...");
        let (status, body) = self.send(Method::GET, "/project-service/api/about", &[], None).await?;
        if status != StatusCode::OK {
            return Err(Error::ApiUnreachable { status, body });
        }
        tracing::info!("Connection to the automation API tested successfully");
        Ok(())
    }

    async fn project(&self, project_id: &str) -> Result<Project> {
        self.get(&format!("/project-service/api/projects/{project_id}"), &[]).await
    }

    async fn property_groups(&self, name: &str) -> Result<PropertyGroupPage> {
        self.get("/properties/api/property-groups/", &[("name", name)]).await
    }

    async fn deployment(&self, deployment_id: &str) -> Result<Deployment> {
        self.get(
            &format!("/deployment/api/deployments/{deployment_id}"),
            &[("deleted", "true"), ("expand", "project"), ("expand", "resources")],
        )
        .await
    }

    async fn resource(&self, resource_id: &str) -> Result<ResourceDetail> {
        self.get(&format!("/deployment/api/resources/{resource_id}"), &[]).await
    }

    async fn request(&self, request_id: &str) -> Result<DeploymentRequest> {
        self.get(&format!("/deployment/api/requests/{request_id}"), &[]).await
    }

    async fn user_info(&self, user_id: &str, org_id: &str) -> Result<UserInfo> {
        self.get(&format!("/csp/gateway/am/api/users/{user_id}/orgs/{org_id}/info"), &[]).await
    }

    async fn request_upfront_price(
        &self,
        catalog_item_id: &str,
        request: &UpfrontPriceRequest,
    ) -> Result<UpfrontPriceTicket> {
        let path = format!("/catalog/api/items/{catalog_item_id}/upfront-prices/");
        let body = serde_json::to_string(request)
            .with_context(|_| error::SerializeRequestSnafu { path: path.clone() })?;
        self.call(Method::POST, &path, &[], Some(body)).await
    }

    async fn upfront_price(
        &self,
        catalog_item_id: &str,
        upfront_price_id: &str,
    ) -> Result<UpfrontPrice> {
        self.get(
            &format!("/catalog/api/items/{catalog_item_id}/upfront-prices/{upfront_price_id}"),
            &[],
        )
        .await
    }
}
