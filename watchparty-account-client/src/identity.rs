/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Identity provider REST surface: out-of-band emails and token refresh.
//!
//! Speaks the Identity Toolkit (`accounts:sendOobCode`) and Secure Token
//! (`/v1/token`) protocols. Sign-in itself happens elsewhere; this client
//! only acts on behalf of an already signed-in user.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_SECURE_TOKEN_BASE_URL: &str = "https://securetoken.googleapis.com";

#[derive(Debug, Serialize)]
#[serde(tag = "requestType")]
enum OobCodeRequest<'a> {
    #[serde(rename = "PASSWORD_RESET")]
    PasswordReset { email: &'a str },
    #[serde(rename = "VERIFY_EMAIL")]
    VerifyEmail {
        #[serde(rename = "idToken")]
        id_token: &'a str,
    },
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

/// A fresh ID token obtained from a refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in_secs: u64,
    pub user_id: String,
}

impl TryFrom<TokenResponse> for RefreshedToken {
    type Error = ApiError;

    fn try_from(raw: TokenResponse) -> Result<Self, Self::Error> {
        let expires_in_secs = raw.expires_in.parse().map_err(|_| ApiError::Identity {
            code: format!("INVALID_EXPIRES_IN:{}", raw.expires_in),
        })?;
        Ok(Self {
            id_token: raw.id_token,
            refresh_token: raw.refresh_token,
            expires_in_secs,
            user_id: raw.user_id,
        })
    }
}

/// Client for the identity provider's REST API.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    api_key: String,
    identity_base_url: String,
    secure_token_base_url: String,
    http: reqwest::Client,
}

impl IdentityClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_endpoints(
            api_key,
            DEFAULT_IDENTITY_BASE_URL,
            DEFAULT_SECURE_TOKEN_BASE_URL,
        )
    }

    /// Point the client at alternative endpoints, e.g. a local emulator.
    pub fn with_endpoints(api_key: &str, identity_base_url: &str, secure_token_base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            identity_base_url: identity_base_url.trim_end_matches('/').to_string(),
            secure_token_base_url: secure_token_base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn oob_url(&self) -> String {
        format!("{}/v1/accounts:sendOobCode", self.identity_base_url)
    }

    fn token_url(&self) -> String {
        format!("{}/v1/token", self.secure_token_base_url)
    }

    /// Send the password-reset email to `email`.
    pub async fn send_password_reset_email(&self, email: &str) -> Result<(), ApiError> {
        log::info!("Requesting password reset email");
        self.send_oob_code(&OobCodeRequest::PasswordReset { email })
            .await
    }

    /// Send the address-verification email for the user owning `id_token`.
    pub async fn send_email_verification(&self, id_token: &str) -> Result<(), ApiError> {
        log::info!("Requesting email verification");
        self.send_oob_code(&OobCodeRequest::VerifyEmail { id_token })
            .await
    }

    async fn send_oob_code(&self, request: &OobCodeRequest<'_>) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.oob_url())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(provider_error(status, &text))
    }

    /// Exchange a refresh token for a new ID token.
    pub async fn refresh_id_token(&self, refresh_token: &str) -> Result<RefreshedToken, ApiError> {
        let response = self
            .http
            .post(self.token_url())
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let text = response.text().await.unwrap_or_default();
            return Err(provider_error(status, &text));
        }
        let raw: TokenResponse = response.json().await?;
        RefreshedToken::try_from(raw)
    }
}

/// Provider errors carry a machine-readable code in `error.message`.
fn provider_error(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(parsed) => ApiError::Identity {
            code: parsed.error.message,
        },
        Err(_) => ApiError::ServerError {
            status,
            body: body.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oob_requests_are_tagged() {
        let reset = serde_json::to_value(OobCodeRequest::PasswordReset { email: "a@b.c" }).unwrap();
        assert_eq!(
            reset,
            serde_json::json!({"requestType": "PASSWORD_RESET", "email": "a@b.c"})
        );
        let verify = serde_json::to_value(OobCodeRequest::VerifyEmail { id_token: "tok" }).unwrap();
        assert_eq!(
            verify,
            serde_json::json!({"requestType": "VERIFY_EMAIL", "idToken": "tok"})
        );
    }

    #[test]
    fn provider_error_code_is_extracted() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_NOT_FOUND","errors":[]}}"#;
        assert!(matches!(
            provider_error(400, body),
            ApiError::Identity { code } if code == "EMAIL_NOT_FOUND"
        ));
        assert!(matches!(
            provider_error(502, "<html>bad gateway</html>"),
            ApiError::ServerError { status: 502, .. }
        ));
    }

    #[test]
    fn refreshed_token_parses_string_expiry() {
        let raw: TokenResponse = serde_json::from_str(
            r#"{"expires_in":"3600","token_type":"Bearer","refresh_token":"r2",
                "id_token":"i2","user_id":"u1","project_id":"p"}"#,
        )
        .unwrap();
        let token = RefreshedToken::try_from(raw).unwrap();
        assert_eq!(token.expires_in_secs, 3600);
        assert_eq!(token.id_token, "i2");
        assert_eq!(token.refresh_token, "r2");
    }

    #[test]
    fn endpoints_are_configurable() {
        let client = IdentityClient::with_endpoints("k", "http://localhost:9099/", "http://localhost:9099/securetoken/");
        assert_eq!(client.oob_url(), "http://localhost:9099/v1/accounts:sendOobCode");
        assert_eq!(client.token_url(), "http://localhost:9099/securetoken/v1/token");
    }
}
