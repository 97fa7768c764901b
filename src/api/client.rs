use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::Session;

use super::cancel::CancelToken;
use super::error::ApiError;
use super::params::RequestParams;
use super::response::ApiResponse;
use super::upload::{build_form, Files, UploadOptions};

pub type ApiResult<T> = Result<T, ApiError>;

/// Invoked whenever the backend answers 401.
pub type AuthErrorHook = Arc<dyn Fn() + Send + Sync>;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pass as `data` to `post`/`put`/`patch` when the call has no body.
pub const NO_BODY: Option<&'static ()> = None;

const REQUEST_ID_HEADER: &str = "x-request-id";

enum RequestBody {
    Empty,
    Json(Vec<u8>),
    Multipart(reqwest::multipart::Form),
}

/// Raw outcome of a round trip, before interpretation.
struct Exchange {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

/// Typed request surface over the marketplace backend.
///
/// Cloning is cheap: clones share the connection pool, the session and the
/// auth-error hook.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    session: Session,
    on_auth_error: Option<AuthErrorHook>,
    cancel: Option<CancelToken>,
}

pub struct ApiClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
    session: Session,
    on_auth_error: Option<AuthErrorHook>,
}

impl ApiClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn on_auth_error(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_auth_error = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> ApiResult<ApiClient> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            ApiError::new(format!("Invalid base URL {}: {}", self.base_url, e), None)
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::new(format!("Invalid base URL {}", self.base_url), None));
        }

        let mut defaults = HeaderMap::new();
        defaults.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(10)
            .default_headers(defaults);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder.build().map_err(|e| ApiError::transport(&e))?;

        Ok(ApiClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
            session: self.session,
            on_auth_error: self.on_auth_error,
            cancel: None,
        })
    }
}

impl ApiClient {
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            session: Session::new(),
            on_auth_error: None,
        }
    }

    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::builder(base_url).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Sets or clears the bearer token for every later request made through
    /// this client or anything sharing its session.
    pub fn set_auth_token(&self, token: Option<String>) {
        self.session.set_token(token);
    }

    /// A client whose requests give up as soon as `token` is cancelled.
    pub fn with_cancellation(&self, token: CancelToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Option<&RequestParams>,
    ) -> ApiResult<ApiResponse<T>> {
        self.request(Method::GET, url, params, RequestBody::Empty).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Option<&RequestParams>,
    ) -> ApiResult<ApiResponse<T>> {
        self.request(Method::DELETE, url, params, RequestBody::Empty).await
    }

    pub async fn post<T, D>(&self, url: &str, data: Option<&D>) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let body = json_body(data)?;
        self.request(Method::POST, url, None, body).await
    }

    pub async fn put<T, D>(&self, url: &str, data: Option<&D>) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let body = json_body(data)?;
        self.request(Method::PUT, url, None, body).await
    }

    pub async fn patch<T, D>(&self, url: &str, data: Option<&D>) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let body = json_body(data)?;
        self.request(Method::PATCH, url, None, body).await
    }

    /// Posts one or more files as `multipart/form-data`, together with any
    /// scalar fields in `options`.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        url: &str,
        files: impl Into<Files>,
        options: UploadOptions,
    ) -> ApiResult<ApiResponse<T>> {
        let form = build_form(files.into(), options)?;
        self.request(Method::POST, url, None, RequestBody::Multipart(form))
            .await
    }

    /// Sends raw bytes with `PUT` to an absolute URL outside the backend,
    /// such as a presigned storage URL. No auth header is attached and the
    /// 401 hook is not involved. Anything but `200 OK` is an error.
    pub async fn put_external(
        &self,
        absolute_url: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ApiResult<()> {
        let builder = self
            .client
            .put(absolute_url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes);

        debug!(url = %absolute_url, "PUT external");
        let exchange = self.exchange(builder).await?;

        if exchange.status != StatusCode::OK {
            warn!(url = %absolute_url, status = exchange.status.as_u16(), "external upload rejected");
            return Err(ApiError::from_response_body(
                exchange.status,
                &String::from_utf8_lossy(&exchange.body),
            ));
        }

        Ok(())
    }

    fn endpoint(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        format!("{}/{}", self.base_url, url.trim_start_matches('/'))
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        params: Option<&RequestParams>,
        body: RequestBody,
    ) -> ApiResult<ApiResponse<T>> {
        let request_id = Uuid::new_v4();
        let builder = self.prepare(method.clone(), url, params, body, request_id);

        debug!(%method, url, %request_id, "dispatching request");
        let exchange = self.exchange(builder).await?;
        debug!(%method, url, %request_id, status = exchange.status.as_u16(), "response received");

        self.interpret(&method, url, exchange)
    }

    /// Request stage. Headers are applied in a fixed order: the body decides
    /// the content type (JSON bodies declare it, multipart bodies leave it to
    /// the transport so the boundary is computed), then the bearer token.
    fn prepare(
        &self,
        method: Method,
        url: &str,
        params: Option<&RequestParams>,
        body: RequestBody,
        request_id: Uuid,
    ) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, self.endpoint(url))
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(params) = params {
            let pairs = params.pairs();
            if !pairs.is_empty() {
                builder = builder.query(&pairs);
            }
        }

        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(bytes),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    async fn exchange(&self, builder: RequestBuilder) -> ApiResult<Exchange> {
        let round_trip = async {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?.to_vec();
            Ok::<_, reqwest::Error>(Exchange {
                status,
                headers,
                body,
            })
        };

        let outcome = match &self.cancel {
            Some(token) if token.is_cancelled() => return Err(ApiError::cancelled()),
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(ApiError::cancelled()),
                    outcome = round_trip => outcome,
                }
            }
            None => round_trip.await,
        };

        outcome.map_err(|e| self.transport_error(&e))
    }

    /// Response stage.
    fn interpret<T: DeserializeOwned>(
        &self,
        method: &Method,
        url: &str,
        exchange: Exchange,
    ) -> ApiResult<ApiResponse<T>> {
        let Exchange {
            status,
            headers,
            body,
        } = exchange;

        if status.is_success() {
            return ApiResponse::decode(status.as_u16(), &headers, &body);
        }

        warn!(%method, url, status = status.as_u16(), "request failed");

        if status == StatusCode::UNAUTHORIZED {
            if let Some(hook) = &self.on_auth_error {
                info!(url, "session rejected, notifying auth error hook");
                hook();
            }
        }

        Err(ApiError::from_response_body(
            status,
            &String::from_utf8_lossy(&body),
        ))
    }

    fn transport_error(&self, error: &reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::timeout(self.timeout)
        } else {
            ApiError::transport(error)
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("session", &self.session)
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

fn json_body<D: Serialize + ?Sized>(data: Option<&D>) -> ApiResult<RequestBody> {
    match data {
        None => Ok(RequestBody::Empty),
        Some(data) => serde_json::to_vec(data)
            .map(RequestBody::Json)
            .map_err(|e| ApiError::new(format!("Failed to serialize request body: {}", e), None)),
    }
}
