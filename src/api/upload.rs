use futures_util::stream;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::client::ApiResult;
use super::error::ApiError;

const CHUNK_SIZE: usize = 64 * 1024;

/// Receives the uploaded fraction of the multipart body, from 0.0 to 1.0.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Reads a file from disk and guesses its content type from the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn guessed_content_type(&self) -> String {
        self.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
    }
}

/// One file or several, each sent under the same multipart field name.
#[derive(Debug, Clone)]
pub enum Files {
    One(UploadFile),
    Many(Vec<UploadFile>),
}

impl Files {
    fn default_field(&self) -> &'static str {
        match self {
            Files::One(_) => "file",
            Files::Many(_) => "files",
        }
    }

    fn into_vec(self) -> Vec<UploadFile> {
        match self {
            Files::One(file) => vec![file],
            Files::Many(files) => files,
        }
    }
}

impl From<UploadFile> for Files {
    fn from(file: UploadFile) -> Self {
        Files::One(file)
    }
}

impl From<Vec<UploadFile>> for Files {
    fn from(files: Vec<UploadFile>) -> Self {
        Files::Many(files)
    }
}

#[derive(Clone, Default)]
pub struct UploadOptions {
    pub field_name: Option<String>,
    pub additional_data: Vec<(String, String)>,
    pub on_progress: Option<ProgressCallback>,
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.additional_data.push((key.into(), value.to_string()));
        self
    }

    pub fn on_progress(mut self, callback: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }
}

/// Builds the multipart body. File parts are streamed in chunks so that
/// progress can be reported as the transport pulls bytes.
pub(crate) fn build_form(files: Files, options: UploadOptions) -> ApiResult<Form> {
    let field = options
        .field_name
        .clone()
        .unwrap_or_else(|| files.default_field().to_string());
    let files = files.into_vec();

    let total: u64 = files.iter().map(|file| file.len() as u64).sum();
    let sent = Arc::new(AtomicU64::new(0));

    let mut form = Form::new();
    for file in files {
        let content_type = file.guessed_content_type();
        let length = file.len() as u64;
        let mut chunks: Vec<Vec<u8>> = file.bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        if chunks.is_empty() {
            // One empty chunk still reports progress for an empty file.
            chunks.push(Vec::new());
        }

        let sent = Arc::clone(&sent);
        let progress = options.on_progress.clone();
        let body = stream::iter(chunks.into_iter().map(move |chunk| {
            let done = sent.fetch_add(chunk.len() as u64, Ordering::SeqCst) + chunk.len() as u64;
            if let Some(callback) = &progress {
                callback(fraction(done, total));
            }
            Ok::<_, std::io::Error>(chunk)
        }));

        let part = Part::stream_with_length(Body::wrap_stream(body), length)
            .file_name(file.file_name)
            .mime_str(&content_type)
            .map_err(|e| ApiError::new(format!("Invalid content type {}: {}", content_type, e), None))?;
        form = form.part(field.clone(), part);
    }

    for (key, value) in options.additional_data {
        form = form.text(key, value);
    }

    Ok(form)
}

fn fraction(done: u64, total: u64) -> f64 {
    if total == 0 {
        1.0
    } else {
        (done as f64 / total as f64).min(1.0)
    }
}
