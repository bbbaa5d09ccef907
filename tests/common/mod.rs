//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use forum_client::api::ForumClient;
use forum_client::config::{ApiConfig, SecureString};
use forum_client::model::{Role, User};
use mock_backend::MockBackend;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// Short timeouts so failing tests fail fast.
pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_ms: 2000,
        connect_timeout_ms: 500,
        ..ApiConfig::default()
    }
}

pub fn client_for(mock: &MockBackend) -> ForumClient {
    ForumClient::new(&api_config(&mock.base_url())).expect("Failed to build client")
}

/// Install `token` as if the user had signed in with `role`.
pub fn sign_in_as(client: &ForumClient, token: &str, role: Role) {
    client.session().install(
        SecureString::new(token),
        Some(User {
            username: "mira".to_string(),
            email: None,
            role,
        }),
    );
}

/// Unsigned JWT whose payload carries `username`.
pub fn fake_jwt(username: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "sub": username, "exp": 4102444800i64 })
            .to_string()
            .as_bytes(),
    );
    format!("{}.{}.sig", header, payload)
}

pub fn category_json(id: &str, title: &str) -> Value {
    json!({ "_id": id, "title": title, "description": "", "image": null })
}

pub fn post_json(id: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "category": "Chess",
        "profile": "pr1",
        "author": "mira",
        "title": format!("post {}", id),
        "content": "body",
        "images": [],
        "likes": 0,
        "dislikes": 0,
        "blocked": false,
        "createdAt": created_at,
    })
}

pub fn comment_json(id: &str, post: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "postId": post,
        "profile": "pr1",
        "author": "mira",
        "content": "nice",
        "likes": 0,
        "dislikes": 0,
        "blocked": false,
        "createdAt": created_at,
    })
}

/// Write `content` to a config file inside a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, content).expect("Failed to write config");
    (temp_dir, path)
}
