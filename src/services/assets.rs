use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiClient, Paging, RequestParams, ToParams};
use crate::models::{Asset, AssetStatus};

use super::resource::{ReadResource, StatusFilter, WriteResource};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetFilters {
    pub status: StatusFilter<AssetStatus>,
    pub category_id: Option<String>,
    pub search: Option<String>,
    pub paging: Paging,
}

impl ToParams for AssetFilters {
    fn to_params(&self) -> RequestParams {
        let params = RequestParams::new()
            .insert_opt("status", self.status.selected().map(|s| s.as_str()))
            .insert_text("categoryId", self.category_id.as_deref())
            .insert_text("search", self.search.as_deref());
        self.paging.apply(params)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAsset {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAsset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AssetStatus>,
}

#[derive(Clone, Debug)]
pub struct AssetsService {
    client: ApiClient,
}

#[async_trait]
impl ReadResource for AssetsService {
    type Summary = Asset;
    type Detail = Asset;
    type Filters = AssetFilters;

    const PATH: &'static str = "/assets";

    fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl WriteResource for AssetsService {
    type Create = CreateAsset;
    type Update = UpdateAsset;
}

impl AssetsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}
