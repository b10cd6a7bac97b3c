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

//! Error types for the account and identity clients.

use thiserror::Error;

/// Errors returned by [`AccountApiClient`](crate::AccountApiClient) and
/// [`IdentityClient`](crate::IdentityClient) methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The identity token is missing, expired, or invalid (HTTP 401).
    #[error("Not authenticated. Please sign in again.")]
    NotAuthenticated,

    /// The server denied access (HTTP 403).
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// The requested resource was not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A server error with status code and body.
    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    /// The identity provider rejected the request (e.g. `EMAIL_NOT_FOUND`,
    /// `TOO_MANY_ATTEMPTS_TRY_LATER`, `TOKEN_EXPIRED`).
    #[error("Identity provider error: {code}")]
    Identity { code: String },

    /// A network or transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A configuration error (e.g. missing base URL or API key).
    #[error("Configuration error: {0}")]
    Config(String),
}
