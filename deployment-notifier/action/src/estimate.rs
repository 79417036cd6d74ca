use deployment_notifier_core::{
    model::{api::UpfrontPriceRequest, InvocationInputs},
    poll::PollPolicy,
};

use crate::{
    api_client::AutomationApi,
    error::{Error, Result},
    poller::Poller,
};

/// Asks the catalog for the daily price of the requested deployment and
/// waits for the estimate.
///
/// # Errors
///
/// Returns an error if the inputs lack the catalog item, the estimate carries
/// no price, or the wait runs out of attempts.
pub async fn daily_price(
    api: &dyn AutomationApi,
    inputs: &InvocationInputs,
    deployment_name: &str,
    policy: PollPolicy,
) -> Result<f64> {
    let catalog_item_id =
        inputs.catalog_item_id.as_deref().ok_or(Error::MissingInput { field: "catalogItemId" })?;

    tracing::info!(catalog_item_id, "Requesting daily price estimate...");
    let request = UpfrontPriceRequest {
        bulk_request_count: "1".to_string(),
        deployment_name: format!("{deployment_name} - Daily Price Estimate"),
        inputs: inputs.request_inputs.clone(),
        project_id: inputs.project_id.clone(),
        version: inputs.catalog_item_version.clone(),
    };
    let ticket = api.request_upfront_price(catalog_item_id, &request).await?;

    let mut poller = Poller::new(policy, "the daily price estimate");
    let mut price = api.upfront_price(catalog_item_id, &ticket.upfront_price_id).await?;
    while !price.is_ready() {
        poller.next_attempt().await?;
        price = api.upfront_price(catalog_item_id, &ticket.upfront_price_id).await?;
    }

    price
        .daily_total_price
        .ok_or(Error::MissingField { operation: "upfront price", field: "dailyTotalPrice" })
}
