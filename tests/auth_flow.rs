//! Sign-in, sign-out and account endpoints.

mod common;

use common::mock_backend::{MockBackend, MockResponse};
use common::{client_for, fake_jwt};
use forum_client::api::{Credentials, NewAccount};
use forum_client::config::SecureString;
use forum_client::model::Role;
use serde_json::json;

#[tokio::test]
async fn test_signin_installs_token_and_user() {
    let mock = MockBackend::start().await;
    mock.route(
        "POST /auth/signin",
        MockResponse::value(json!({
            "accessToken": "t1",
            "user": { "username": "mira", "email": "mira@example.com", "role": "moderator" }
        })),
    )
    .await;

    let client = client_for(&mock);
    let user = client
        .auth()
        .signin(&Credentials::new("mira", "pw"))
        .await
        .unwrap();

    assert_eq!(user.role, Role::Moderator);
    assert_eq!(client.session().user(), Some(user));
    assert!(client.session().is_authenticated());

    let requests = mock.captured_requests().await;
    assert_eq!(requests[0].header("authorization"), None);
    assert_eq!(
        requests[0].json(),
        json!({ "username": "mira", "password": "pw" })
    );
}

#[tokio::test]
async fn test_signin_without_user_reads_token_subject() {
    let mock = MockBackend::start().await;
    let token = fake_jwt("zed");
    mock.route(
        "POST /auth/signin",
        MockResponse::value(json!({ "accessToken": token })),
    )
    .await;

    let client = client_for(&mock);
    let user = client
        .auth()
        .signin(&Credentials::new("someone", "pw"))
        .await
        .unwrap();

    assert_eq!(user.username, "zed");
    assert_eq!(user.role, Role::User);
    assert_eq!(
        client.session().claims().and_then(|c| c.sub),
        Some("zed".to_string())
    );
}

#[tokio::test]
async fn test_bad_credentials_leave_session_empty() {
    let mock = MockBackend::start().await;
    mock.route("POST /auth/signin", MockResponse::error(401, "wrong password"))
        .await;

    let client = client_for(&mock);
    let err = client
        .auth()
        .signin(&Credentials::new("mira", "nope"))
        .await
        .unwrap_err();

    assert_eq!(err.error_type(), "server_error");
    assert!(!client.session().is_authenticated());
    // Sign-in failures never go through the refresh path.
    assert_eq!(mock.count("POST", "/auth/refresh").await, 0);
}

#[tokio::test]
async fn test_signout_clears_session_even_on_failure() {
    let mock = MockBackend::start().await;
    mock.route("POST /auth/signout", MockResponse::error(500, "down"))
        .await;

    let client = client_for(&mock);
    client.session().install(SecureString::new("t1"), None);

    assert!(client.auth().signout().await.is_err());
    assert!(!client.session().is_authenticated());
    assert!(client.session().user().is_none());
}

#[tokio::test]
async fn test_account_endpoints_are_public() {
    let mock = MockBackend::start().await;
    mock.route(
        "POST /auth/find",
        MockResponse::value(json!({ "username": "mira" })),
    )
    .await;

    let client = client_for(&mock);
    client.session().install(SecureString::new("t1"), None);

    client
        .auth()
        .signup(&NewAccount {
            username: "zed".to_string(),
            email: "zed@example.com".to_string(),
            password: SecureString::new("pw"),
        })
        .await
        .unwrap();
    let lookup = client.auth().find("mira@example.com").await.unwrap();
    client
        .auth()
        .change("mira", &SecureString::new("new-pw"))
        .await
        .unwrap();

    assert_eq!(lookup.username.as_deref(), Some("mira"));

    let requests = mock.captured_requests().await;
    let paths: Vec<&str> = requests.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["/auth/signup", "/auth/find", "/auth/change"]);
    assert!(requests.iter().all(|r| r.header("authorization").is_none()));
    assert_eq!(requests[2].json()["password"], "new-pw");
}
