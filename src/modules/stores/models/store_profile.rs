use serde::{Deserialize, Deserializer, Serialize};

use crate::core::ShopId;

/// One platform account row with its raw JSON documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountRecord {
    pub account: String,
    pub operator_name: Option<String>,
    pub sales_name: Option<String>,
    pub city_name: Option<String>,
    /// JSON array of store entries
    pub stores_json: Option<String>,
    /// Optional JSON array of region entries
    pub region_json: Option<String>,
}

/// People and city attached to a store through its account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreMetadata {
    pub operator: String,
    pub sales: String,
    pub city: String,
}

/// Region hierarchy of a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreRegion {
    pub city: String,
    pub district: String,
    pub region: String,
}

/// Everything the layout engine knows about a store besides its metrics.
/// Every field is an empty string when the lookup missed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreProfile {
    pub operator: String,
    pub sales: String,
    pub city: String,
    pub district: String,
    pub region: String,
}

/// Entry of `stores_json`
#[derive(Debug, Deserialize)]
pub(crate) struct StoreEntry {
    #[serde(default, deserialize_with = "deserialize_shop_id")]
    pub shop_id: Option<ShopId>,
}

/// Entry of `region_json`
#[derive(Debug, Deserialize)]
pub(crate) struct RegionEntry {
    #[serde(default, deserialize_with = "deserialize_shop_id")]
    pub shop_id: Option<ShopId>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Accepts `1001`, `"1001"` or anything else (mapped to `None`)
fn deserialize_shop_id<'de, D>(deserializer: D) -> Result<Option<ShopId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(number) => number.as_i64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}
