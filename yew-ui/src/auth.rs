// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication session
//!
//! The sign-in page persists the identity provider's session in
//! `localStorage`; this module reads it back, keeps the ID token fresh and
//! clears it on sign-out.

use anyhow::anyhow;
use gloo_storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::constants::identity_client;

const SESSION_KEY: &str = "watchparty_session";

/// Tokens expiring within this window are refreshed before use.
const REFRESH_MARGIN_MS: u64 = 60_000;

/// The signed-in identity as persisted by the sign-in flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub id_token: String,
    pub refresh_token: String,
    /// Unix timestamp (ms) at which `id_token` stops being accepted.
    pub expires_at_ms: u64,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl AuthSession {
    pub fn needs_refresh(&self, now_ms: u64) -> bool {
        self.expires_at_ms <= now_ms.saturating_add(REFRESH_MARGIN_MS)
    }

    /// Profile picture, falling back to the Gravatar identicon for the email.
    pub fn avatar_url(&self) -> Option<String> {
        if let Some(url) = self.photo_url.as_ref().filter(|u| !u.is_empty()) {
            return Some(url.clone());
        }
        self.email.as_deref().map(gravatar_url)
    }
}

pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    let hash: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("https://www.gravatar.com/avatar/{hash}?d=identicon")
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

pub fn load_session() -> Option<AuthSession> {
    LocalStorage::get::<AuthSession>(SESSION_KEY).ok()
}

pub fn save_session(session: &AuthSession) {
    if let Err(e) = LocalStorage::set(SESSION_KEY, session) {
        log::warn!("Failed to persist session: {e:?}");
    }
}

pub fn clear_session() {
    LocalStorage::delete(SESSION_KEY);
}

/// Sign out locally. The provider's tokens simply stop being used.
pub fn sign_out() {
    log::info!("Signing out");
    clear_session();
}

/// Return a session whose ID token is valid for at least another minute,
/// refreshing and persisting it when necessary.
pub async fn ensure_fresh_token(session: &AuthSession) -> anyhow::Result<AuthSession> {
    if !session.needs_refresh(now_ms()) {
        return Ok(session.clone());
    }
    log::debug!("ID token expiring, refreshing");
    let client = identity_client().map_err(|e| anyhow!("Config error: {e}"))?;
    let refreshed = client
        .refresh_id_token(&session.refresh_token)
        .await
        .map_err(|e| anyhow!("Token refresh failed: {e}"))?;
    if refreshed.user_id != session.uid {
        return Err(anyhow!("Token refresh returned a different user"));
    }
    let updated = AuthSession {
        id_token: refreshed.id_token,
        refresh_token: refreshed.refresh_token,
        expires_at_ms: now_ms() + refreshed.expires_in_secs * 1000,
        ..session.clone()
    };
    save_session(&updated);
    Ok(updated)
}
