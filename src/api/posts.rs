use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Post;
use crate::store::{Entity, Scope};
use crate::transport::{ApiRequest, Attachment, FormData, RequestBody};

use super::error::ApiError;
use super::repository::Repository;
use super::resource::{format_cursor, Paginated, Payload, Resource};

impl Resource for Post {
    fn list_request(scope: &Scope) -> Result<ApiRequest, ApiError> {
        let request = ApiRequest::get([Self::KIND.path()]);
        match scope {
            Scope::All => Ok(request),
            Scope::Category(title) => Ok(request.query("category", title.as_str())),
            Scope::Profile(id) => Ok(request.query("profile", id.as_str())),
            Scope::Author(username) => Ok(request.query("author", username.as_str())),
            other => Err(ApiError::UnsupportedScope {
                kind: Self::KIND,
                scope: other.clone(),
            }),
        }
    }
}

impl Paginated for Post {
    fn page_request(scope: &Scope, before: DateTime<Utc>) -> Result<ApiRequest, ApiError> {
        Ok(Self::list_request(scope)?.query("lastDate", format_cursor(before)))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    /// Category title.
    pub category: String,
    /// Id of the publishing profile.
    pub profile: String,
    pub title: String,
    pub content: String,
    #[serde(skip)]
    pub images: Vec<Attachment>,
}

impl Payload<Post> for NewPost {
    fn into_body(mut self) -> Result<RequestBody, ApiError> {
        if self.images.is_empty() {
            return Ok(RequestBody::json(&self)?);
        }

        let images = std::mem::take(&mut self.images);
        let form = FormData::new()
            .text("category", self.category)
            .text("profile", self.profile)
            .text("title", self.title)
            .text("content", self.content);
        Ok(RequestBody::Form(
            images
                .into_iter()
                .fold(form, |form, image| form.file("images", image)),
        ))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Payload<Post> for PostPatch {
    fn into_body(self) -> Result<RequestBody, ApiError> {
        Ok(RequestBody::json(&self)?)
    }
}

impl Repository<Post> {
    pub async fn fetch_by_id(&self, id: &str) -> Result<Post, ApiError> {
        self.fetch_one(&ApiRequest::get([Post::KIND.path(), id]))
            .await
    }
}
