use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

wire_enum!(AssetStatus {
    Available => "AVAILABLE",
    InUse => "IN_USE",
    Maintenance => "MAINTENANCE",
    Retired => "RETIRED",
});

/// Equipment or material a provider lists and assigns to jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<f64>,
    pub status: AssetStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
