use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::api::envelope::unwrap_data;
use crate::api::{ApiClient, ApiResult, Paging, RequestParams, ToParams};
use crate::models::{Payment, PaymentMethod, PaymentStatus};

use super::resource::{item_path, ReadResource, StatusFilter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentFilters {
    pub status: StatusFilter<PaymentStatus>,
    pub method: Option<PaymentMethod>,
    pub booking_id: Option<String>,
    pub paging: Paging,
}

impl ToParams for PaymentFilters {
    fn to_params(&self) -> RequestParams {
        let params = RequestParams::new()
            .insert_opt("status", self.status.selected().map(|s| s.as_str()))
            .insert_opt("method", self.method.map(|m| m.as_str()))
            .insert_text("bookingId", self.booking_id.as_deref());
        self.paging.apply(params)
    }
}

/// Starts payment for a booking. Online methods come back with a
/// `checkout_url`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub booking_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PaymentsService {
    client: ApiClient,
}

#[async_trait]
impl ReadResource for PaymentsService {
    type Summary = Payment;
    type Detail = Payment;
    type Filters = PaymentFilters;

    const PATH: &'static str = "/payments";

    fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl PaymentsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, payload: &CreatePayment) -> ApiResult<Payment> {
        let response = self
            .client
            .post::<Value, _>(Self::PATH, Some(payload))
            .await?;
        unwrap_data(response.data)
    }

    /// Confirms a gateway callback. `gateway_params` is the query string the
    /// gateway redirected back with, passed through untouched.
    pub async fn verify(&self, id: &str, gateway_params: &RequestParams) -> ApiResult<Payment> {
        let path = format!("{}/verify", item_path(Self::PATH, id));
        let response = self.client.get::<Value>(&path, Some(gateway_params)).await?;
        unwrap_data(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mock_backend, query_of};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn test_create_returns_checkout_url() {
        let (server, client) = mock_backend().await;
        Mock::given(method("POST"))
            .and(path("/api/payments"))
            .and(body_json(json!({"bookingId": "b1", "amount": 350000.0, "method": "VNPAY"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {
                "id": "p1", "bookingId": "b1", "amount": 350000, "method": "VNPAY",
                "status": "PENDING", "checkoutUrl": "https://pay.example/checkout/p1"
            }})))
            .expect(1)
            .mount(&server)
            .await;

        let payment = PaymentsService::new(client)
            .create(&CreatePayment {
                booking_id: "b1".to_string(),
                amount: 350000.0,
                method: PaymentMethod::VnPay,
                return_url: None,
            })
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.currency, "VND");
        assert!(payment.checkout_url.is_some());
    }

    #[tokio::test]
    async fn test_verify_forwards_gateway_params() {
        let (server, client) = mock_backend().await;
        Mock::given(method("GET"))
            .and(path("/api/payments/p1/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {
                "id": "p1", "amount": 350000, "method": "VNPAY", "status": "PAID"
            }})))
            .mount(&server)
            .await;

        let params = RequestParams::new()
            .insert("vnp_ResponseCode", "00")
            .insert("vnp_TxnRef", "p1");
        let payment = PaymentsService::new(client).verify("p1", &params).await.unwrap();

        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(
            query_of(&server, 0).await.as_deref(),
            Some("vnp_ResponseCode=00&vnp_TxnRef=p1")
        );
    }
}
