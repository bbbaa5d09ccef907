use std::sync::Arc;

use crate::config::ApiConfig;
use crate::model::{Category, Comment, Post, Profile, Subcomment};
use crate::transport::{Session, Transport, TransportError};

use super::auth::Auth;
use super::repository::Repository;

/// One transport, one session and one store per entity kind.
///
/// Cloning is cheap and every clone shares the same session and stores.
#[derive(Clone)]
pub struct ForumClient {
    transport: Arc<Transport>,
    auth: Auth,
    categories: Repository<Category>,
    profiles: Repository<Profile>,
    posts: Repository<Post>,
    comments: Repository<Comment>,
    subcomments: Repository<Subcomment>,
}

impl ForumClient {
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        Self::with_session(config, Session::new())
    }

    /// Build a client around an existing session handle.
    pub fn with_session(config: &ApiConfig, session: Session) -> Result<Self, TransportError> {
        let transport = Arc::new(Transport::new(config, session)?);
        tracing::debug!(base_url = %transport.base_url(), "Forum client ready");

        Ok(Self {
            auth: Auth::new(transport.clone()),
            categories: Repository::new(transport.clone()),
            profiles: Repository::new(transport.clone()),
            posts: Repository::new(transport.clone()),
            comments: Repository::new(transport.clone()),
            subcomments: Repository::new(transport.clone()),
            transport,
        })
    }

    pub fn session(&self) -> &Session {
        self.transport.session()
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn categories(&self) -> &Repository<Category> {
        &self.categories
    }

    pub fn profiles(&self) -> &Repository<Profile> {
        &self.profiles
    }

    pub fn posts(&self) -> &Repository<Post> {
        &self.posts
    }

    pub fn comments(&self) -> &Repository<Comment> {
        &self.comments
    }

    pub fn subcomments(&self) -> &Repository<Subcomment> {
        &self.subcomments
    }
}
