use serde::Serialize;

use crate::model::Category;
use crate::store::{Entity, NaturalKey, Scope};
use crate::transport::{ApiRequest, Attachment, FormData, RequestBody};

use super::error::ApiError;
use super::repository::Repository;
use super::resource::{Payload, Resource};

impl Resource for Category {
    fn list_request(scope: &Scope) -> Result<ApiRequest, ApiError> {
        match scope {
            Scope::All => Ok(ApiRequest::get([Self::KIND.path()])),
            other => Err(ApiError::UnsupportedScope {
                kind: Self::KIND,
                scope: other.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip)]
    pub image: Option<Attachment>,
}

impl NewCategory {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            image: None,
        }
    }
}

impl Payload<Category> for NewCategory {
    fn into_body(mut self) -> Result<RequestBody, ApiError> {
        match self.image.take() {
            Some(image) => Ok(RequestBody::Form(
                FormData::new()
                    .text("title", self.title)
                    .text_opt("description", self.description)
                    .file("image", image),
            )),
            None => Ok(RequestBody::json(&self)?),
        }
    }

    fn natural_key(&self) -> Option<NaturalKey> {
        Some(NaturalKey::new([self.title.as_str()]))
    }
}

impl Repository<Category> {
    /// Load one category by its title and keep it in the store.
    pub async fn fetch_by_title(&self, title: &str) -> Result<Category, ApiError> {
        let request = ApiRequest::get([Category::KIND.path(), title]);
        self.fetch_one(&request).await
    }
}
