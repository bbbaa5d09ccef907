//! Request and response descriptions.
//!
//! An `ApiRequest` is a plain description, not a live HTTP request: every
//! attempt (including the retry after a token refresh) builds a fresh
//! `reqwest` request from it, so multipart bodies can be sent twice.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::TransportError;

/// A request against the forum API, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path segments; each one is percent-encoded when the URL is built.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

/// Request payload.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Form(FormData),
}

impl RequestBody {
    /// Serialize any payload into a JSON body.
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, TransportError> {
        Ok(RequestBody::Json(serde_json::to_value(payload)?))
    }
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    pub fn patch<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::PATCH, segments)
    }

    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, segments)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Display form of the path, used in logs.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Resolve the request URL against `base`.
    pub fn url(&self, base: &Url) -> Result<Url, TransportError> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                TransportError::InvalidRequest(format!("Base URL '{}' cannot carry a path", base))
            })?;
            segments.pop_if_empty();
            segments.extend(self.segments.iter());
        }
        Ok(url)
    }
}

/// Flat key/value form, sent as multipart with one part per key.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: Vec<(String, FormValue)>,
}

#[derive(Debug, Clone)]
pub enum FormValue {
    Text(String),
    File(Attachment),
}

/// File contents attached to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = guess_mime(&file_name).to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Read an attachment from disk.
    pub async fn from_path(path: &Path) -> Result<Self, TransportError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            TransportError::InvalidRequest(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), FormValue::Text(value.into())));
        self
    }

    /// Add a text field only when a value is present.
    pub fn text_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.text(key, value),
            None => self,
        }
    }

    pub fn file(mut self, key: impl Into<String>, attachment: Attachment) -> Self {
        self.fields.push((key.into(), FormValue::File(attachment)));
        self
    }

    pub fn fields(&self) -> &[(String, FormValue)] {
        &self.fields
    }

    /// Encode as a multipart form. Called once per attempt.
    pub fn to_multipart(&self) -> Result<Form, TransportError> {
        let mut form = Form::new();
        for (key, value) in &self.fields {
            form = match value {
                FormValue::Text(text) => form.text(key.clone(), text.clone()),
                FormValue::File(file) => {
                    let part = Part::bytes(file.bytes.clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.mime)
                        .map_err(|e| {
                            TransportError::InvalidRequest(format!(
                                "Invalid mime type '{}': {}",
                                file.mime, e
                            ))
                        })?;
                    form.part(key.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

/// A successful response with its body fully read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
