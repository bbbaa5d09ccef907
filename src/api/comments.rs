use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Comment, Subcomment};
use crate::store::{Entity, Scope};
use crate::transport::{ApiRequest, RequestBody};

use super::error::ApiError;
use super::resource::{format_cursor, Paginated, Payload, Resource};

impl Resource for Comment {
    fn list_request(scope: &Scope) -> Result<ApiRequest, ApiError> {
        Self::page_request(scope, Utc::now())
    }
}

impl Paginated for Comment {
    fn page_request(scope: &Scope, before: DateTime<Utc>) -> Result<ApiRequest, ApiError> {
        match scope {
            Scope::Post(post) => Ok(ApiRequest::get([
                Self::KIND.path(),
                post.as_str(),
                format_cursor(before).as_str(),
            ])),
            other => Err(ApiError::UnsupportedScope {
                kind: Self::KIND,
                scope: other.clone(),
            }),
        }
    }
}

impl Resource for Subcomment {
    fn list_request(scope: &Scope) -> Result<ApiRequest, ApiError> {
        Self::page_request(scope, Utc::now())
    }
}

impl Paginated for Subcomment {
    fn page_request(scope: &Scope, before: DateTime<Utc>) -> Result<ApiRequest, ApiError> {
        match scope {
            Scope::Comment(comment) => Ok(ApiRequest::get([
                Self::KIND.path(),
                comment.as_str(),
                format_cursor(before).as_str(),
            ])),
            other => Err(ApiError::UnsupportedScope {
                kind: Self::KIND,
                scope: other.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    /// Id of the commented post.
    pub post: String,
    /// Id of the commenting profile.
    pub profile: String,
    pub content: String,
}

impl Payload<Comment> for NewComment {
    fn into_body(self) -> Result<RequestBody, ApiError> {
        Ok(RequestBody::json(&self)?)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSubcomment {
    /// Id of the parent comment.
    pub comment: String,
    pub profile: String,
    pub content: String,
}

impl Payload<Subcomment> for NewSubcomment {
    fn into_body(self) -> Result<RequestBody, ApiError> {
        Ok(RequestBody::json(&self)?)
    }
}

/// Edit of a comment's or reply's text.
#[derive(Debug, Clone, Serialize)]
pub struct ContentPatch {
    pub content: String,
}

impl Payload<Comment> for ContentPatch {
    fn into_body(self) -> Result<RequestBody, ApiError> {
        Ok(RequestBody::json(&self)?)
    }
}

impl Payload<Subcomment> for ContentPatch {
    fn into_body(self) -> Result<RequestBody, ApiError> {
        Ok(RequestBody::json(&self)?)
    }
}
