use serde::Serialize;

use crate::model::{profile_key, Profile};
use crate::store::{Entity, NaturalKey, Scope};
use crate::transport::{ApiRequest, Attachment, FormData, RequestBody};

use super::error::ApiError;
use super::repository::Repository;
use super::resource::{Payload, Resource};

impl Resource for Profile {
    fn list_request(scope: &Scope) -> Result<ApiRequest, ApiError> {
        let request = ApiRequest::get([Self::KIND.path()]);
        match scope {
            Scope::All => Ok(request),
            Scope::Author(username) => Ok(request.query("user", username.as_str())),
            Scope::Category(title) => Ok(request.query("category", title.as_str())),
            other => Err(ApiError::UnsupportedScope {
                kind: Self::KIND,
                scope: other.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub nickname: String,
    /// Category title.
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(skip)]
    pub image: Option<Attachment>,
}

impl Payload<Profile> for NewProfile {
    fn into_body(mut self) -> Result<RequestBody, ApiError> {
        match self.image.take() {
            Some(image) => Ok(RequestBody::Form(
                FormData::new()
                    .text("nickname", self.nickname)
                    .text("category", self.category)
                    .text_opt("introduction", self.introduction)
                    .file("image", image),
            )),
            None => Ok(RequestBody::json(&self)?),
        }
    }

    fn natural_key(&self) -> Option<NaturalKey> {
        Some(profile_key(&self.category, &self.nickname))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(skip)]
    pub image: Option<Attachment>,
}

impl Payload<Profile> for ProfilePatch {
    fn into_body(mut self) -> Result<RequestBody, ApiError> {
        match self.image.take() {
            Some(image) => Ok(RequestBody::Form(
                FormData::new()
                    .text_opt("nickname", self.nickname)
                    .text_opt("introduction", self.introduction)
                    .file("image", image),
            )),
            None => Ok(RequestBody::json(&self)?),
        }
    }
}

impl Repository<Profile> {
    pub async fn fetch_by_id(&self, id: &str) -> Result<Profile, ApiError> {
        self.fetch_one(&ApiRequest::get([Profile::KIND.path(), id]))
            .await
    }
}
