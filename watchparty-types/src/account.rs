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

//! Account types for the backend `/linkAccount` and `/deleteAccount`
//! endpoints.
//!
//! Request bodies are JSON objects; the identity token travels in the body
//! (or the query string for `GET`) rather than in a header.

use serde::{Deserialize, Serialize};

/// Third-party service an account can be linked to.
///
/// Unknown kinds are kept verbatim so a backend that learns a new provider
/// never breaks list parsing in an older UI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkKind {
    Discord,
    Other(String),
}

impl LinkKind {
    pub fn as_str(&self) -> &str {
        match self {
            LinkKind::Discord => "discord",
            LinkKind::Other(kind) => kind.as_str(),
        }
    }
}

impl From<String> for LinkKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "discord" => LinkKind::Discord,
            _ => LinkKind::Other(kind),
        }
    }
}

impl From<LinkKind> for String {
    fn from(kind: LinkKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A third-party account linked to the signed-in user.
///
/// ```json
/// { "kind": "discord", "accountname": "Ann", "discriminator": "0007" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAccount {
    pub kind: LinkKind,
    pub accountname: String,
    #[serde(default)]
    pub discriminator: String,
}

impl LinkAccount {
    /// `accountname#discriminator`, the form Discord users recognise.
    pub fn display_name(&self) -> String {
        format!("{}#{}", self.accountname, self.discriminator)
    }
}

/// Return the first linked account of the given kind.
pub fn find_linked<'a>(accounts: &'a [LinkAccount], kind: &LinkKind) -> Option<&'a LinkAccount> {
    accounts.iter().find(|account| &account.kind == kind)
}

/// Query parameters for `GET /linkAccount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkAccountQuery {
    pub uid: String,
    pub token: String,
}

/// Request body for `DELETE /linkAccount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlinkAccountRequest {
    pub uid: String,
    pub token: String,
    pub kind: LinkKind,
}

/// Request body for `DELETE /deleteAccount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAccountRequest {
    pub uid: String,
    pub token: String,
}
