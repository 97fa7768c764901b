use serde::{Deserialize, Serialize};

/// Company registration details returned by a tax-code lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxInfo {
    #[serde(alias = "id")]
    pub tax_code: String,
    pub name: String,
    #[serde(default)]
    pub international_name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}
