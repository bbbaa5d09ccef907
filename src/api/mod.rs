//! Entity repositories and account endpoints over the shared transport.

mod auth;
mod categories;
mod client;
mod comments;
mod error;
mod posts;
mod profiles;
mod repository;
mod resource;

pub use auth::{AccountLookup, Auth, Credentials, NewAccount};
pub use categories::NewCategory;
pub use client::ForumClient;
pub use comments::{ContentPatch, NewComment, NewSubcomment};
pub use error::ApiError;
pub use posts::{NewPost, PostPatch};
pub use profiles::{NewProfile, ProfilePatch};
pub use repository::Repository;
pub use resource::{format_cursor, Paginated, Payload, Reaction, Resource};
