//! HTTP-level tests for the Identity Toolkit client against a mock emulator.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobfinder_models::{SocialCredential, SocialProvider};

use crate::client::{IdentityConfig, IdentityToolkitClient};
use crate::error::{AuthErrorCode, IdentityError};

fn client_for(server: &MockServer) -> IdentityToolkitClient {
    let config = IdentityConfig {
        api_key: "test-key".to_string(),
        emulator_host: Some(server.uri().trim_start_matches("http://").to_string()),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    };
    IdentityToolkitClient::new(config).unwrap()
}

fn error_body(message: &str) -> serde_json::Value {
    json!({ "error": { "code": 400, "message": message, "errors": [] } })
}

#[tokio::test]
async fn test_sign_up() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identitytoolkit.googleapis.com/v1/accounts:signUp"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "email": "ada@example.com",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "identitytoolkit#SignupNewUserResponse",
            "localId": "uid-1",
            "email": "ada@example.com",
            "idToken": "id-token",
            "refreshToken": "refresh",
            "expiresIn": "3600"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client_for(&server)
        .sign_up("ada@example.com", "secret1")
        .await
        .unwrap();

    assert_eq!(resp.local_id, "uid-1");
    assert_eq!(resp.id_token, "id-token");
    assert_eq!(resp.expires_in.as_deref(), Some("3600"));
}

#[tokio::test]
async fn test_sign_up_email_exists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identitytoolkit.googleapis.com/v1/accounts:signUp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body("EMAIL_EXISTS")))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sign_up("ada@example.com", "secret1")
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(&AuthErrorCode::EmailAlreadyInUse));
}

#[tokio::test]
async fn test_sign_in_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(error_body("INVALID_LOGIN_CREDENTIALS")),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sign_in_with_password("ada@example.com", "nope")
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(&AuthErrorCode::InvalidCredential));
}

#[tokio::test]
async fn test_sign_in_with_idp_sends_post_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identitytoolkit.googleapis.com/v1/accounts:signInWithIdp"))
        .and(body_partial_json(json!({
            "postBody": "id_token=google-id-token&providerId=google.com",
            "requestUri": "https://jobs.example.com/login",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-9",
            "email": "g@example.com",
            "displayName": "Grace",
            "idToken": "id-token",
            "providerId": "google.com",
            "isNewUser": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = SocialCredential {
        id_token: Some("google-id-token".into()),
        access_token: None,
        request_uri: Some("https://jobs.example.com/login".into()),
    };
    let resp = client_for(&server)
        .sign_in_with_idp(SocialProvider::Google, &credential)
        .await
        .unwrap();

    assert_eq!(resp.local_id.as_deref(), Some("uid-9"));
    assert_eq!(resp.display_name.as_deref(), Some("Grace"));
    assert!(resp.is_new_user);
    assert!(!resp.need_confirmation);
}

#[tokio::test]
async fn test_update_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identitytoolkit.googleapis.com/v1/accounts:update"))
        .and(body_partial_json(json!({
            "idToken": "id-token",
            "displayName": "Ada"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-1",
            "displayName": "Ada"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .update_display_name("id-token", "Ada")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_non_json_error_is_unexpected_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sign_in_with_password("ada@example.com", "secret1")
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::UnexpectedResponse(503, _)));
}
