use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::api::envelope::unwrap_data;
use crate::api::{ApiClient, ApiResult, Paging, RequestParams, ToParams};
use crate::models::{Role, User};

use super::resource::{item_path, ReadResource, WriteResource};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilters {
    pub role: Option<Role>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub paging: Paging,
}

impl ToParams for UserFilters {
    fn to_params(&self) -> RequestParams {
        let params = RequestParams::new()
            .insert_opt("role", self.role.map(|r| r.as_str()))
            .insert_text("search", self.search.as_deref())
            .insert_opt("isActive", self.is_active);
        self.paging.apply(params)
    }
}

/// Accounts created by admins and managers (staff, providers).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActiveRequest {
    is_active: bool,
}

#[derive(Clone, Debug)]
pub struct UsersService {
    client: ApiClient,
}

#[async_trait]
impl ReadResource for UsersService {
    type Summary = User;
    type Detail = User;
    type Filters = UserFilters;

    const PATH: &'static str = "/users";

    fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl WriteResource for UsersService {
    type Create = CreateUser;
    type Update = UpdateUser;
}

impl UsersService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Updates the signed-in user's own profile. `role` is ignored by the
    /// backend on this route.
    pub async fn update_profile(&self, changes: &UpdateUser) -> ApiResult<User> {
        let response = self
            .client
            .patch::<Value, _>("/users/profile", Some(changes))
            .await?;
        unwrap_data(response.data)
    }

    pub async fn set_active(&self, id: &str, is_active: bool) -> ApiResult<User> {
        let path = format!("{}/status", item_path(Self::PATH, id));
        let response = self
            .client
            .patch::<Value, _>(&path, Some(&ActiveRequest { is_active }))
            .await?;
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
    async fn test_list_filters_by_role_and_flattens_page() {
        let (server, client) = mock_backend().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "items": [{"id": "u2", "email": "an@x.vn", "fullName": "An", "role": "STAFF"}],
                    "total": 1, "page": 1, "limit": 20
                }
            })))
            .mount(&server)
            .await;

        let filters = UserFilters {
            role: Some(Role::Staff),
            is_active: Some(true),
            ..Default::default()
        };
        let page = UsersService::new(client).list(Some(&filters)).await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page.meta.total, Some(1));
        assert_eq!(query_of(&server, 0).await.as_deref(), Some("role=STAFF&isActive=true"));
    }

    #[tokio::test]
    async fn test_update_profile_sends_changed_fields_only() {
        let (server, client) = mock_backend().await;
        Mock::given(method("PATCH"))
            .and(path("/api/users/profile"))
            .and(body_json(json!({"phone": "0901234567"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "u1", "email": "lan@x.vn", "fullName": "Lan", "role": "CUSTOMER", "phone": "0901234567"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let changes = UpdateUser {
            phone: Some("0901234567".to_string()),
            ..Default::default()
        };
        let user = UsersService::new(client).update_profile(&changes).await.unwrap();
        assert_eq!(user.phone.as_deref(), Some("0901234567"));
    }

    #[tokio::test]
    async fn test_remove_accepts_empty_body() {
        let (server, client) = mock_backend().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/u5"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        UsersService::new(client).remove("u5").await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_accepts_plain_text_confirmation() {
        let (server, client) = mock_backend().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Deleted successfully"))
            .expect(1)
            .mount(&server)
            .await;

        UsersService::new(client).remove("u1").await.unwrap();
    }
}
