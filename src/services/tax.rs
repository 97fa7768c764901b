use serde_json::Value;

use crate::api::envelope::unwrap_data;
use crate::api::{ApiClient, ApiResult};
use crate::models::TaxInfo;

use super::resource::item_path;

/// Company lookup by tax code, used when providers register as businesses.
#[derive(Clone, Debug)]
pub struct TaxService {
    client: ApiClient,
}

impl TaxService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `Ok(None)` when the backend reports the code as unknown (404).
    pub async fn lookup(&self, tax_code: &str) -> ApiResult<Option<TaxInfo>> {
        let code = tax_code.trim();
        match self.client.get::<Value>(&item_path("/tax-lookup", code), None).await {
            Ok(response) => unwrap_data(response.data).map(Some),
            Err(error) if error.status_code == Some(404) => Ok(None),
            Err(error) => Err(error),
        }
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
    async fn test_lookup_found_and_missing() {
        let (server, client) = mock_backend().await;
        Mock::given(method("GET"))
            .and(path("/api/tax-lookup/0101243150"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": "0101243150", "name": "CÔNG TY TNHH ABC", "address": "Hà Nội"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tax-lookup/0000000000"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Không tìm thấy mã số thuế",
                "statusCode": 404
            })))
            .mount(&server)
            .await;

        let service = TaxService::new(client);
        let found = service.lookup(" 0101243150 ").await.unwrap().unwrap();
        assert_eq!(found.tax_code, "0101243150");
        assert_eq!(service.lookup("0000000000").await.unwrap(), None);
    }
}
