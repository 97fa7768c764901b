use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::envelope::{unwrap_data, unwrap_page};
use crate::api::{ApiClient, ApiResult, Page, ToParams};

/// `{base}/{id}` with the id escaped as a single path segment.
pub fn item_path(base: &str, id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), urlencoding::encode(id))
}

/// Read side of a backend resource.
///
/// Implementors only name their types and base path; listing and lookup go
/// through the shared envelope handling, so every resource returns the same
/// flat shapes.
#[async_trait]
pub trait ReadResource: Send + Sync {
    type Summary: DeserializeOwned + Send;
    type Detail: DeserializeOwned + Send;
    type Filters: ToParams + Send + Sync;

    const PATH: &'static str;

    fn client(&self) -> &ApiClient;

    async fn list(&self, filters: Option<&Self::Filters>) -> ApiResult<Page<Self::Summary>> {
        let params = filters.map(ToParams::to_params);
        let response = self.client().get::<Value>(Self::PATH, params.as_ref()).await?;
        unwrap_page(response.data)
    }

    async fn detail(&self, id: &str) -> ApiResult<Self::Detail> {
        let response = self
            .client()
            .get::<Value>(&item_path(Self::PATH, id), None)
            .await?;
        unwrap_data(response.data)
    }
}

/// Write side. Payload types hold only the fields a caller may change.
#[async_trait]
pub trait WriteResource: ReadResource {
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;

    async fn create(&self, payload: &Self::Create) -> ApiResult<Self::Detail> {
        let response = self
            .client()
            .post::<Value, _>(Self::PATH, Some(payload))
            .await?;
        unwrap_data(response.data)
    }

    async fn update(&self, id: &str, payload: &Self::Update) -> ApiResult<Self::Detail> {
        let response = self
            .client()
            .patch::<Value, _>(&item_path(Self::PATH, id), Some(payload))
            .await?;
        unwrap_data(response.data)
    }

    async fn remove(&self, id: &str) -> ApiResult<()> {
        self.client()
            .delete::<Value>(&item_path(Self::PATH, id), None)
            .await?;
        Ok(())
    }
}

/// A status filter where `All` means "do not filter".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl<S: Copy> StatusFilter<S> {
    pub fn selected(&self) -> Option<S> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }
}

impl<S> From<S> for StatusFilter<S> {
    fn from(status: S) -> Self {
        StatusFilter::Only(status)
    }
}

impl<S: std::str::FromStr> std::str::FromStr for StatusFilter<S> {
    type Err = S::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}
