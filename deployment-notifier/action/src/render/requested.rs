use deployment_notifier_core::model::value_to_text;
use indexmap::IndexMap;
use serde_json::Value;

pub const DAILY_PRICE_ESTIMATE: &str = "Daily Price Estimate";

/// The request inputs shown in a "request received" notification.
///
/// Always lists node size, node count, target network and the first
/// comma-separated token of the operating system (`""` when not requested),
/// followed by every extra input named by the property group (`" "` when not
/// requested).
#[must_use]
pub fn summarize(
    request_inputs: &IndexMap<String, Value>,
    custom_properties: &[String],
) -> IndexMap<String, Value> {
    let text = |key: &str| request_inputs.get(key).map(value_to_text).unwrap_or_default();

    let operating_system = text("operatingSystem")
        .split(',')
        .next()
        .map(str::to_string)
        .unwrap_or_default();

    let mut summary = IndexMap::from([
        ("Node Size".to_string(), Value::String(text("nodeSize"))),
        ("Node count".to_string(), Value::String(text("nodeCount"))),
        ("Target Network".to_string(), Value::String(text("targetNetwork"))),
        ("Operating System".to_string(), Value::String(operating_system)),
    ]);

    for name in custom_properties {
        let value = request_inputs.get(name).cloned().unwrap_or_else(|| Value::String(" ".into()));
        let _replaced = summary.insert(name.clone(), value);
    }

    summary
}

/// `<currency> <integer part>.<first two decimals>`, truncating the price.
#[must_use]
pub fn format_price(currency: &str, price: f64) -> String {
    let text = price.to_string();
    let (integer, decimals) = text.split_once('.').unwrap_or((text.as_str(), "0"));
    let decimals: String = decimals.chars().take(2).collect();
    format!("{currency} {integer}.{decimals}")
}
