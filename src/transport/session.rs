//! In-memory session state shared by the transport and the auth API.
//!
//! The access token is the one piece of shared mutable state in the client.
//! It is only replaced through `install` (sign-in, refresh) and dropped
//! through `clear` (sign-out, failed refresh). Every change bumps the
//! generation so a request can tell whether the token it was sent with is
//! still current.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Deserialize;

use crate::config::SecureString;
use crate::model::User;

/// Cloneable handle to the current session.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
}

#[derive(Default)]
struct SessionInner {
    access_token: Option<SecureString>,
    user: Option<User>,
    generation: u64,
}

/// Token and generation read together at send time.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub access_token: Option<SecureString>,
    pub generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.read();
        SessionSnapshot {
            access_token: inner.access_token.clone(),
            generation: inner.generation,
        }
    }

    pub fn access_token(&self) -> Option<SecureString> {
        self.inner.read().access_token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().access_token.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Claims carried by the current access token, if it is a JWT.
    pub fn claims(&self) -> Option<TokenClaims> {
        let token = self.access_token()?;
        TokenClaims::decode(token.expose())
    }

    /// Replace the access token. A `None` user keeps the signed-in user,
    /// which is what a refresh wants.
    pub fn install(&self, token: SecureString, user: Option<User>) -> u64 {
        let mut inner = self.inner.write();
        inner.access_token = Some(token);
        if user.is_some() {
            inner.user = user;
        }
        inner.generation += 1;
        tracing::debug!(generation = inner.generation, "Access token installed");
        inner.generation
    }

    /// Drop the token and user.
    pub fn clear(&self) -> u64 {
        let mut inner = self.inner.write();
        inner.access_token = None;
        inner.user = None;
        inner.generation += 1;
        tracing::debug!(generation = inner.generation, "Session cleared");
        inner.generation
    }
}

/// Unverified JWT payload fields the client cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of a JWT without checking its signature.
    pub fn decode(token: &str) -> Option<Self> {
        let payload = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Username carried by the token, preferring an explicit claim over `sub`.
    pub fn subject(&self) -> Option<&str> {
        self.username.as_deref().or(self.sub.as_deref())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_install_and_clear_bump_generation() {
        let session = Session::new();
        assert_eq!(session.generation(), 0);
        assert!(!session.is_authenticated());

        session.install(SecureString::new("a"), None);
        assert_eq!(session.generation(), 1);
        assert_eq!(session.access_token().unwrap().expose(), "a");

        session.clear();
        assert_eq!(session.generation(), 2);
        assert!(session.access_token().is_none());
    }

    #[test]
    fn test_refresh_install_keeps_user() {
        let session = Session::new();
        let user = User {
            username: "mira".to_string(),
            email: None,
            role: Role::Moderator,
        };
        session.install(SecureString::new("a"), Some(user.clone()));
        session.install(SecureString::new("b"), None);
        assert_eq!(session.user(), Some(user));
    }

    #[test]
    fn test_claims_decode() {
        let token = jwt(r#"{"sub":"u-1","username":"mira","exp":1700000000}"#);
        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.subject(), Some("mira"));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_claims_decode_rejects_opaque_token() {
        assert!(TokenClaims::decode("opaque-token").is_none());
    }
}
