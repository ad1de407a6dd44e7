// Catalog feed envelope: the document shape a backend catalog API delivers.
// Destination and product entries stay untyped here so each one can be
// validated individually during ingest; one malformed entry must not poison
// the whole document.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// External association between a destination and the products listed under
// it. Neither schema carries the relation itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListing {
    pub destination_id: u64,
    pub product_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFeed {
    pub feed_id: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub destinations: Vec<Value>,
    #[serde(default)]
    pub products: Vec<Value>,
    #[serde(default)]
    pub listings: Vec<CatalogListing>,
}
