use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiClient, Paging, RequestParams, ToParams};
use crate::models::Category;

use super::resource::{ReadResource, WriteResource};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFilters {
    pub is_active: Option<bool>,
    pub parent_id: Option<String>,
    pub search: Option<String>,
    pub paging: Paging,
}

impl ToParams for CategoryFilters {
    fn to_params(&self) -> RequestParams {
        let params = RequestParams::new()
            .insert_opt("isActive", self.is_active)
            .insert_text("parentId", self.parent_id.as_deref())
            .insert_text("search", self.search.as_deref());
        self.paging.apply(params)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct CategoriesService {
    client: ApiClient,
}

#[async_trait]
impl ReadResource for CategoriesService {
    type Summary = Category;
    type Detail = Category;
    type Filters = CategoryFilters;

    const PATH: &'static str = "/categories";

    fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl WriteResource for CategoriesService {
    type Create = CreateCategory;
    type Update = UpdateCategory;
}

impl CategoriesService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}
