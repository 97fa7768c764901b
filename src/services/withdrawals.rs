use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::api::envelope::unwrap_data;
use crate::api::{ApiClient, ApiResult, Paging, RequestParams, ToParams};
use crate::models::{Withdrawal, WithdrawalStatus};

use super::resource::{item_path, ReadResource, StatusFilter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WithdrawalFilters {
    pub status: StatusFilter<WithdrawalStatus>,
    pub paging: Paging,
}

impl ToParams for WithdrawalFilters {
    fn to_params(&self) -> RequestParams {
        let params = RequestParams::new()
            .insert_opt("status", self.status.selected().map(|s| s.as_str()));
        self.paging.apply(params)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWithdrawal {
    pub amount: f64,
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ReviewRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

#[derive(Clone, Debug)]
pub struct WithdrawalsService {
    client: ApiClient,
}

#[async_trait]
impl ReadResource for WithdrawalsService {
    type Summary = Withdrawal;
    type Detail = Withdrawal;
    type Filters = WithdrawalFilters;

    const PATH: &'static str = "/withdrawals";

    fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl WithdrawalsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, payload: &CreateWithdrawal) -> ApiResult<Withdrawal> {
        let response = self
            .client
            .post::<Value, _>(Self::PATH, Some(payload))
            .await?;
        unwrap_data(response.data)
    }

    pub async fn approve(&self, id: &str, note: Option<&str>) -> ApiResult<Withdrawal> {
        self.review(id, "approve", note).await
    }

    pub async fn reject(&self, id: &str, note: Option<&str>) -> ApiResult<Withdrawal> {
        self.review(id, "reject", note).await
    }

    async fn review(&self, id: &str, action: &str, note: Option<&str>) -> ApiResult<Withdrawal> {
        let path = format!("{}/{}", item_path(Self::PATH, id), action);
        let response = self
            .client
            .patch::<Value, _>(&path, Some(&ReviewRequest { note }))
            .await?;
        unwrap_data(response.data)
    }
}
