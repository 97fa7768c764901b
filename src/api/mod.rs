pub mod cancel;
pub mod client;
pub mod envelope;
pub mod error;
pub mod params;
pub mod response;
pub mod upload;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use client::{ApiClient, ApiClientBuilder, ApiResult, AuthErrorHook, DEFAULT_TIMEOUT, NO_BODY};
pub use envelope::{Page, PageMeta};
pub use error::{field_errors, ApiError, ErrorMessage, FieldError};
pub use params::{Paging, ParamValue, RequestParams, Scalar, ToParams};
pub use response::ApiResponse;
pub use upload::{Files, ProgressCallback, UploadFile, UploadOptions};
