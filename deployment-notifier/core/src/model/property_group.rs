use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    time,
};

/// Names of the property-group entries the notifier reads.
pub mod keys {
    pub const TIME_ZONE: &str = "timeZone";
    pub const LOGO: &str = "logo";
    pub const LOGO_WIDTH_PIXELS: &str = "logo_company_width_pixels";
    pub const LOGO_HEIGHT_PIXELS: &str = "logo_company_height_pixels";
    pub const PLATFORM_NAME: &str = "platform_name";
    pub const SMTP_SERVER: &str = "smtp_server";
    pub const SMTP_PORT: &str = "smtp_port";
    pub const SMTP_USER: &str = "smtp_user";
    pub const SENDER_EMAIL: &str = "sender_email";
    pub const SMTP_AUTHENTICATED: &str = "smtp_authenticated";
    pub const SMTP_CONNECTION_SECURITY: &str = "smtp_connection_security";
    pub const CUSTOM_PROPERTY_DISPLAY: &str = "custom_property_display";
}

/// Operator configuration attached to a project, shaped
/// `{ "<name>": { "const": <value>, ... }, ... }`.
///
/// Entries keep their definition order so the group can be echoed back in
/// the outputs unchanged.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertyGroup(IndexMap<String, Value>);

impl PropertyGroup {
    #[must_use]
    pub const fn entries(&self) -> &IndexMap<String, Value> { &self.0 }

    /// The `const` value of `key`, if the entry exists and has one.
    #[must_use]
    pub fn constant(&self, key: &str) -> Option<&Value> { self.0.get(key)?.get("const") }

    /// The `const` value of `key` as text. Strings are taken as-is, other
    /// JSON values are printed.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> { self.constant(key).map(value_to_text) }

    /// Like [`Self::text`], with a single blank for optional entries that are
    /// not defined.
    #[must_use]
    pub fn text_or_blank(&self, key: &str) -> String {
        self.text(key).unwrap_or_else(|| " ".to_string())
    }

    /// # Errors
    ///
    /// Returns an error if the entry is missing.
    pub fn required_text(&self, key: &str) -> Result<String> {
        self.text(key).ok_or_else(|| Error::MissingProperty { key: key.to_string() })
    }

    /// # Errors
    ///
    /// Returns an error if `timeZone` is missing or not a known zone.
    pub fn time_zone(&self) -> Result<Tz> {
        time::parse_time_zone(&self.required_text(keys::TIME_ZONE)?)
    }

    /// # Errors
    ///
    /// Returns an error if `smtp_port` is missing or not a port number.
    pub fn smtp_port(&self) -> Result<u16> {
        let value = self
            .constant(keys::SMTP_PORT)
            .ok_or_else(|| Error::MissingProperty { key: keys::SMTP_PORT.to_string() })?;

        let port = match value {
            Value::Number(number) => number.as_u64().and_then(|port| u16::try_from(port).ok()),
            Value::String(text) => text.trim().parse::<u16>().ok(),
            _ => None,
        };
        port.ok_or_else(|| Error::InvalidProperty {
            key: keys::SMTP_PORT.to_string(),
            value: value.to_string(),
        })
    }

    /// Truthiness of an entry: `false`, `null`, `0`, `""`, `[]` and `{}`
    /// are false, everything else is true.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing.
    pub fn flag(&self, key: &str) -> Result<bool> {
        let value =
            self.constant(key).ok_or_else(|| Error::MissingProperty { key: key.to_string() })?;
        Ok(is_truthy(value))
    }

    /// The names listed under `custom_property_display`, empty when the
    /// entry is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry exists but is not a list of strings.
    pub fn custom_property_display(&self) -> Result<Vec<String>> {
        let Some(value) = self.constant(keys::CUSTOM_PROPERTY_DISPLAY) else {
            return Ok(Vec::new());
        };

        let invalid = || Error::InvalidProperty {
            key: keys::CUSTOM_PROPERTY_DISPLAY.to_string(),
            value: value.to_string(),
        };
        value
            .as_array()
            .ok_or_else(invalid)?
            .iter()
            .map(|name| name.as_str().map(str::to_string).ok_or_else(invalid))
            .collect()
    }
}

/// Renders a JSON value the way it appears in a notification.
#[must_use]
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}
