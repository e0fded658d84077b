//! Identity Toolkit request and response bodies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IdpRequest<'a> {
    /// Form-encoded provider credential (`id_token=...&providerId=google.com`)
    pub post_body: String,
    pub request_uri: &'a str,
    pub return_secure_token: bool,
    pub return_idp_credential: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProfileRequest<'a> {
    pub id_token: &'a str,
    pub display_name: &'a str,
    pub return_secure_token: bool,
}

/// Response of `accounts:signUp` and `accounts:signInWithPassword`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds, sent as a string
    #[serde(default)]
    pub expires_in: Option<String>,
}

/// Response of `accounts:signInWithIdp`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdpSignInResponse {
    #[serde(default)]
    pub local_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub is_new_user: bool,
    /// Set when the email already belongs to an account with another sign-in method
    #[serde(default)]
    pub need_confirmation: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idp_response_defaults() {
        let resp: IdpSignInResponse = serde_json::from_str(
            r#"{"localId":"u1","email":"a@x.com","needConfirmation":true}"#,
        )
        .unwrap();
        assert!(resp.need_confirmation);
        assert!(!resp.is_new_user);
        assert!(resp.id_token.is_none());
    }

    #[test]
    fn test_password_request_is_camel_case() {
        let json = serde_json::to_value(PasswordRequest {
            email: "a@x.com",
            password: "secret1",
            return_secure_token: true,
        })
        .unwrap();
        assert_eq!(json["returnSecureToken"], true);
    }
}
