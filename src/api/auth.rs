//! Account endpoints under `/auth`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::SecureString;
use crate::model::{Role, User};
use crate::transport::{ApiRequest, RequestBody, Session, TokenClaims, Transport};

use super::error::ApiError;

/// Username and password for sign-in.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecureString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecureString::new(password),
        }
    }

    fn body(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "password": self.password.expose(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: SecureString,
}

/// Server answer to an account lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountLookup {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SigninResponse {
    access_token: String,
    #[serde(default)]
    user: Option<User>,
}

/// Sign-in, sign-out and account management.
#[derive(Clone)]
pub struct Auth {
    transport: Arc<Transport>,
}

impl Auth {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn session(&self) -> &Session {
        self.transport.session()
    }

    /// Sign in and install the returned access token. The refresh
    /// credential arrives as a cookie and stays with the HTTP client.
    pub async fn signin(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let request = ApiRequest::post(["auth", "signin"])
            .with_body(RequestBody::Json(credentials.body()));
        let response: SigninResponse = self.transport.request_public(&request).await?.json()?;

        let token = SecureString::new(response.access_token);
        let user = match response.user {
            Some(user) => user,
            None => User {
                username: TokenClaims::decode(token.expose())
                    .and_then(|claims| claims.subject().map(str::to_string))
                    .unwrap_or_else(|| credentials.username.clone()),
                email: None,
                role: Role::default(),
            },
        };

        self.session().install(token, Some(user.clone()));
        tracing::info!(username = %user.username, role = ?user.role, "Signed in");
        Ok(user)
    }

    /// Sign out. The local session is cleared whatever the server answers.
    pub async fn signout(&self) -> Result<(), ApiError> {
        let request = ApiRequest::post(["auth", "signout"]);
        let result = self.transport.request(&request).await;
        self.session().clear();

        match result {
            Ok(_) => {
                tracing::info!("Signed out");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Sign-out call failed, session cleared anyway");
                Err(err.into())
            }
        }
    }

    pub async fn signup(&self, account: &NewAccount) -> Result<(), ApiError> {
        let request = ApiRequest::post(["auth", "signup"]).with_body(RequestBody::Json(
            serde_json::json!({
                "username": account.username,
                "email": account.email,
                "password": account.password.expose(),
            }),
        ));
        self.transport.request_public(&request).await?;
        tracing::info!(username = %account.username, "Account created");
        Ok(())
    }

    /// Look up an account by its email address.
    pub async fn find(&self, email: &str) -> Result<AccountLookup, ApiError> {
        let request = ApiRequest::post(["auth", "find"])
            .with_body(RequestBody::Json(serde_json::json!({ "email": email })));
        Ok(self.transport.request_public(&request).await?.json()?)
    }

    /// Set a new password for `username`.
    pub async fn change(&self, username: &str, password: &SecureString) -> Result<(), ApiError> {
        let request = ApiRequest::post(["auth", "change"]).with_body(RequestBody::Json(
            serde_json::json!({
                "username": username,
                "password": password.expose(),
            }),
        ));
        self.transport.request_public(&request).await?;
        Ok(())
    }

    /// Force a token refresh outside the retry path.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.transport.refresh().await?;
        Ok(())
    }
}
