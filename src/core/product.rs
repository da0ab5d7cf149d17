//! Product records returned by the lookup API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Currency assumed when the API omits one.
pub const DEFAULT_CURRENCY: &str = "ARS";

/// A product as returned by `GET /api/products/{code}`.
///
/// The backend serializes prices as fixed-point strings (`"1200.00"`) and
/// blank optional fields as empty strings; both are normalized here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// The code this product is registered under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    /// Display name.
    pub title: String,

    /// Unit price.
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,

    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Product photo.
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub image_url: Option<String>,

    /// Free-form description.
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub description: Option<String>,

    /// Brand name.
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub brand: Option<String>,

    /// Extra key/value details.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub attributes: BTreeMap<String, AttributeValue>,

    /// Last time the backend record changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Creates a product with the required fields.
    pub fn new(title: impl Into<String>, price: f64, currency: impl Into<String>) -> Self {
        Self {
            barcode: None,
            title: title.into(),
            price,
            currency: currency.into(),
            image_url: None,
            description: None,
            brand: None,
            attributes: BTreeMap::new(),
            updated_at: None,
        }
    }

    /// Sets the barcode.
    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    /// Sets the image URL.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// An attribute value: text or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A number, kept as written by the API.
    Number(serde_json::Number),
    /// A text value.
    Text(String),
    /// A flag.
    Bool(bool),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(true) => f.write_str("sí"),
            Self::Bool(false) => f.write_str("no"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(value) => Ok(value),
        RawPrice::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid price '{text}'"))),
    }
}

fn deserialize_blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
