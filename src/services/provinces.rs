use serde_json::Value;

use crate::api::envelope::unwrap_page;
use crate::api::{ApiClient, ApiResult};
use crate::models::{District, Province, Ward};

use super::resource::item_path;

const PATH: &str = "/provinces";

/// Vietnamese administrative divisions, used by address forms.
#[derive(Clone, Debug)]
pub struct ProvincesService {
    client: ApiClient,
}

impl ProvincesService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Province>> {
        self.fetch(PATH).await
    }

    pub async fn districts(&self, province_code: &str) -> ApiResult<Vec<District>> {
        self.fetch(&format!("{}/districts", item_path(PATH, province_code)))
            .await
    }

    pub async fn wards(&self, district_code: &str) -> ApiResult<Vec<Ward>> {
        self.fetch(&format!("{}/wards", item_path("/districts", district_code)))
            .await
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let response = self.client.get::<Value>(path, None).await?;
        Ok(unwrap_page(response.data)?.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::mock_backend;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn test_districts_of_province() {
        let (server, client) = mock_backend().await;
        Mock::given(method("GET"))
            .and(path("/api/provinces/79/districts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"code": 760, "name": "Quận 1"}, {"code": 769, "name": "Thủ Đức"}]
            })))
            .mount(&server)
            .await;

        let districts = ProvincesService::new(client).districts("79").await.unwrap();
        assert_eq!(districts.len(), 2);
        assert_eq!(districts[0].code, "760");
    }
}
