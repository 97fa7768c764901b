use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::envelope::unwrap_data;
use crate::api::{ApiClient, ApiResult, NO_BODY};
use crate::models::{Role, User};

#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(alias = "token", alias = "access_token")]
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Clone, Debug)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a token. The session is left untouched;
    /// see [`AuthService::sign_in`].
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = LoginRequest { email, password };
        let response = self
            .client
            .post::<Value, _>("/auth/login", Some(&request))
            .await?;
        unwrap_data(response.data)
    }

    /// Logs in and stores the token in the client's session.
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<User> {
        let login = self.login(email, password).await?;
        self.client.set_auth_token(Some(login.access_token));
        debug!(user_id = %login.user.id, role = %login.user.role, "signed in");
        Ok(login.user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<User> {
        let response = self
            .client
            .post::<Value, _>("/auth/register", Some(request))
            .await?;
        unwrap_data(response.data)
    }

    pub async fn me(&self) -> ApiResult<User> {
        let response = self.client.get::<Value>("/auth/me", None).await?;
        unwrap_data(response.data)
    }

    /// Tells the backend, then clears the session whether or not the call
    /// succeeded.
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self
            .client
            .post::<Value, _>("/auth/logout", NO_BODY)
            .await;
        self.client.set_auth_token(None);
        result.map(|_| ())
    }

    /// Returns the backend's confirmation message, if any.
    pub async fn forgot_password(&self, email: &str) -> ApiResult<Option<String>> {
        let request = ForgotPasswordRequest { email };
        let response = self
            .client
            .post::<Value, _>("/auth/forgot-password", Some(&request))
            .await?;
        Ok(response.message)
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> ApiResult<()> {
        let request = ChangePasswordRequest {
            current_password,
            new_password,
        };
        self.client
            .patch::<Value, _>("/auth/change-password", Some(&request))
            .await?;
        Ok(())
    }
}
