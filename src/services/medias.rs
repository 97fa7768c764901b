use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::envelope::{unwrap_data, unwrap_page};
use crate::api::{ApiClient, ApiResult, UploadFile, UploadOptions};

#[derive(Debug, Clone, Serialize)]
struct PresignedRequest<'a> {
    filename: &'a str,
    filesize: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrl {
    /// Short-lived URL accepting a single `PUT` of the raw file.
    pub presigned_url: String,
    /// Durable reference to store once the upload has succeeded.
    pub url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UploadedImage {
    Url(String),
    Item { url: String },
}

#[derive(Clone, Debug)]
pub struct MediasService {
    client: ApiClient,
}

impl MediasService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn presigned_url(&self, filename: &str, filesize: u64) -> ApiResult<PresignedUrl> {
        let request = PresignedRequest { filename, filesize };
        let response = self
            .client
            .post::<Value, _>("/medias/images/upload/presigned-url", Some(&request))
            .await?;
        unwrap_data(response.data)
    }

    /// Uploads straight to storage through a presigned URL and returns the
    /// durable URL.
    pub async fn upload_presigned(&self, file: UploadFile) -> ApiResult<String> {
        let content_type = file.guessed_content_type();
        let target = self
            .presigned_url(&file.file_name, file.len() as u64)
            .await?;

        self.client
            .put_external(&target.presigned_url, file.bytes, &content_type)
            .await?;

        debug!(url = %target.url, "image stored");
        Ok(target.url)
    }

    /// Uploads images through the backend in one multipart request.
    pub async fn upload_images(
        &self,
        files: Vec<UploadFile>,
        options: UploadOptions,
    ) -> ApiResult<Vec<String>> {
        let response = self
            .client
            .upload::<Value>("/medias/images/upload", files, options)
            .await?;
        let page = unwrap_page::<UploadedImage>(response.data)?;

        Ok(page
            .items
            .into_iter()
            .map(|image| match image {
                UploadedImage::Url(url) | UploadedImage::Item { url } => url,
            })
            .collect())
    }
}
