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

//! Cross-platform REST client for the watchparty account backend.
//!
//! Works on WASM (browser) and native targets via [`reqwest`].
//!
//! # Example
//!
//! ```no_run
//! use watchparty_account_client::AccountApiClient;
//!
//! # async fn example() -> Result<(), watchparty_account_client::ApiError> {
//! let client = AccountApiClient::new("http://localhost:8080");
//! let linked = client.list_linked_accounts("uid-123", "id-token").await?;
//! for account in linked {
//!     println!("{}: {}", account.kind, account.display_name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod error;
pub mod identity;

pub use error::ApiError;
pub use identity::{IdentityClient, RefreshedToken};
pub use watchparty_types;

use reqwest::Client;

/// A typed REST client for the account backend.
///
/// The backend authenticates each call with the identity token carried in
/// the query string or JSON body, so no cookie or header auth is applied.
#[derive(Debug, Clone)]
pub struct AccountApiClient {
    base_url: String,
    http: Client,
}

impl AccountApiClient {
    /// Create a new client pointing at the backend base URL, e.g.
    /// `"https://api.watchparty.me"`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.delete(self.url(path))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Map a non-success status and its body to an [`ApiError`].
pub(crate) fn status_error(status: u16, body: String) -> ApiError {
    match status {
        401 => ApiError::NotAuthenticated,
        403 => ApiError::Forbidden(body),
        404 => ApiError::NotFound(body),
        _ => ApiError::ServerError { status, body },
    }
}

/// Parse a JSON body on 2xx, or map the status to an [`ApiError`].
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    match status {
        200..=299 => Ok(response.json().await?),
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(status_error(status, text))
        }
    }
}

/// Parse a response where we only care about the status code, not the body.
pub(crate) async fn parse_status_only(response: reqwest::Response) -> Result<(), ApiError> {
    let status = response.status().as_u16();
    match status {
        200..=299 => Ok(()),
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(status_error(status, text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let client = AccountApiClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/linkAccount"), "http://localhost:8080/linkAccount");
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(status_error(401, String::new()), ApiError::NotAuthenticated));
        assert!(matches!(status_error(403, "no".into()), ApiError::Forbidden(b) if b == "no"));
        assert!(matches!(status_error(404, String::new()), ApiError::NotFound(_)));
        assert!(matches!(
            status_error(500, "boom".into()),
            ApiError::ServerError { status: 500, .. }
        ));
    }
}
