use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::api::envelope::{unwrap_data, unwrap_page};
use crate::api::{ApiClient, ApiResult, Page, Paging, RequestParams, ToParams};
use crate::models::{Report, ReportStatus, ReportType};

use super::resource::{item_path, ReadResource, StatusFilter, WriteResource};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilters {
    pub status: StatusFilter<ReportStatus>,
    pub report_type: Option<ReportType>,
    pub search: Option<String>,
    pub paging: Paging,
}

impl ToParams for ReportFilters {
    fn to_params(&self) -> RequestParams {
        let params = RequestParams::new()
            .insert_opt("status", self.status.selected().map(|s| s.as_str()))
            .insert_opt("type", self.report_type.map(|t| t.as_str()))
            .insert_text("search", self.search.as_deref());
        self.paging.apply(params)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReport {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
struct ResolveRequest<'a> {
    status: ReportStatus,
    resolution: &'a str,
}

#[derive(Clone, Debug)]
pub struct ReportsService {
    client: ApiClient,
}

#[async_trait]
impl ReadResource for ReportsService {
    type Summary = Report;
    type Detail = Report;
    type Filters = ReportFilters;

    const PATH: &'static str = "/reports";

    fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl WriteResource for ReportsService {
    type Create = CreateReport;
    type Update = UpdateReport;
}

impl ReportsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Reports filed by the signed-in user. This endpoint wraps its list one
    /// envelope deeper than `/reports`; the result has the same shape.
    pub async fn list_mine(&self, filters: Option<&ReportFilters>) -> ApiResult<Page<Report>> {
        let params = filters.map(ToParams::to_params);
        let response = self
            .client
            .get::<Value>("/reports/me", params.as_ref())
            .await?;
        unwrap_page(response.data)
    }

    /// Closes a dispute as resolved or rejected, with the admin's note.
    pub async fn resolve(
        &self,
        id: &str,
        status: ReportStatus,
        resolution: &str,
    ) -> ApiResult<Report> {
        let path = format!("{}/resolve", item_path(Self::PATH, id));
        let request = ResolveRequest { status, resolution };
        let response = self.client.patch::<Value, _>(&path, Some(&request)).await?;
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

    fn report(id: &str) -> Value {
        json!({"id": id, "title": "Broken tap", "type": "SERVICE", "status": "PENDING"})
    }

    #[tokio::test]
    async fn test_all_status_is_not_sent() {
        let (server, client) = mock_backend().await;
        Mock::given(method("GET"))
            .and(path("/api/reports"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let service = ReportsService::new(client);
        let filters = ReportFilters {
            status: StatusFilter::All,
            search: Some(String::new()),
            paging: Paging::new(1, 10),
            ..Default::default()
        };
        service.list(Some(&filters)).await.unwrap();

        assert_eq!(query_of(&server, 0).await.as_deref(), Some("page=1&limit=10"));
    }

    #[tokio::test]
    async fn test_selected_status_and_type_are_sent() {
        let (server, client) = mock_backend().await;
        Mock::given(method("GET"))
            .and(path("/api/reports"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let service = ReportsService::new(client);
        let filters = ReportFilters {
            status: ReportStatus::InProgress.into(),
            report_type: Some(ReportType::Payment),
            search: Some("refund".to_string()),
            ..Default::default()
        };
        service.list(Some(&filters)).await.unwrap();

        assert_eq!(
            query_of(&server, 0).await.as_deref(),
            Some("status=IN_PROGRESS&type=PAYMENT&search=refund")
        );
    }

    #[tokio::test]
    async fn test_double_envelope_matches_single_envelope() {
        let (server, client) = mock_backend().await;
        Mock::given(method("GET"))
            .and(path("/api/reports"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [report("r1"), report("r2")]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/reports/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"success": true, "data": [report("r1"), report("r2")]}
            })))
            .mount(&server)
            .await;

        let service = ReportsService::new(client);
        let all = service.list(None).await.unwrap();
        let mine = service.list_mine(None).await.unwrap();

        assert_eq!(all.items, mine.items);
        assert_eq!(mine.items[1].id, "r2");
    }

    #[tokio::test]
    async fn test_detail_unwraps_envelope() {
        let (server, client) = mock_backend().await;
        Mock::given(method("GET"))
            .and(path("/api/reports/r9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": report("r9")})))
            .mount(&server)
            .await;

        let report = ReportsService::new(client).detail("r9").await.unwrap();
        assert_eq!(report.id, "r9");
        assert_eq!(report.status, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_resolve_sends_status_and_note() {
        let (server, client) = mock_backend().await;
        let mut resolved = report("r3");
        resolved["status"] = json!("RESOLVED");
        Mock::given(method("PATCH"))
            .and(path("/api/reports/r3/resolve"))
            .and(body_json(json!({"status": "RESOLVED", "resolution": "Refund issued"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": resolved})))
            .expect(1)
            .mount(&server)
            .await;

        let report = ReportsService::new(client)
            .resolve("r3", ReportStatus::Resolved, "Refund issued")
            .await
            .unwrap();
        assert!(report.is_closed());
    }

    #[tokio::test]
    async fn test_create_sends_only_mutable_fields() {
        let (server, client) = mock_backend().await;
        Mock::given(method("POST"))
            .and(path("/api/reports"))
            .and(body_json(json!({
                "title": "Late arrival",
                "description": "Staff came 2 hours late",
                "type": "STAFF",
                "bookingId": "b7"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": report("r4")})))
            .expect(1)
            .mount(&server)
            .await;

        let payload = CreateReport {
            title: "Late arrival".to_string(),
            description: "Staff came 2 hours late".to_string(),
            report_type: ReportType::Staff,
            booking_id: Some("b7".to_string()),
            images: Vec::new(),
        };
        let created = ReportsService::new(client).create(&payload).await.unwrap();
        assert_eq!(created.id, "r4");
    }
}
