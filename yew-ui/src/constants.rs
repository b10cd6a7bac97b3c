// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime configuration injected by the hosting page as
//! `window.__APP_CONFIG`.

use serde::Deserialize;
use serde_wasm_bindgen::from_value as from_js_value;
use wasm_bindgen::JsValue;
use watchparty_account_client::identity::{
    DEFAULT_IDENTITY_BASE_URL, DEFAULT_SECURE_TOKEN_BASE_URL,
};
use watchparty_account_client::{AccountApiClient, IdentityClient};
use watchparty_types::truthy;
use web_sys::window;

use crate::types::ViewportSettings;

pub const DEFAULT_OAUTH_REDIRECT_HOSTNAME: &str = "https://www.watchparty.me";
pub const DEFAULT_DISCORD_CLIENT_ID: &str = "1071707916719095908";
pub const DEFAULT_SCROLL_MAX: u32 = 10;

pub const DISCORD_POPUP_FEATURES: &str = "toolbar=0,location=0,menubar=0,width=450,height=900";
pub const GRAVATAR_URL: &str = "https://gravatar.com";

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(rename = "apiBaseUrl")]
    pub api_base_url: String,
    #[serde(rename = "identityApiKey")]
    pub identity_api_key: String,
    #[serde(rename = "identityBaseUrl")]
    #[serde(default)]
    pub identity_base_url: Option<String>,
    #[serde(rename = "secureTokenBaseUrl")]
    #[serde(default)]
    pub secure_token_base_url: Option<String>,
    #[serde(rename = "oauthRedirectHostname")]
    #[serde(default)]
    pub oauth_redirect_hostname: Option<String>,
    #[serde(rename = "discordClientId")]
    #[serde(default)]
    pub discord_client_id: Option<String>,
    #[serde(rename = "autoplay")]
    #[serde(default)]
    pub autoplay: Option<String>,
    #[serde(rename = "scrollMax")]
    #[serde(default)]
    pub scroll_max: Option<u32>,
    #[serde(rename = "scrollInvert")]
    #[serde(default)]
    pub scroll_invert: Option<String>,
}

pub fn app_config() -> Result<RuntimeConfig, String> {
    let win = window().ok_or_else(|| "No window available".to_string())?;
    let config = js_sys::Reflect::get(&win, &JsValue::from_str("__APP_CONFIG"))
        .unwrap_or(JsValue::UNDEFINED);
    if config.is_undefined() || config.is_null() {
        return Err("Runtime configuration not found (window.__APP_CONFIG missing)".to_string());
    }
    from_js_value::<RuntimeConfig>(config)
        .map_err(|e| format!("Failed to parse __APP_CONFIG: {e:?}"))
}

pub fn api_base_url() -> Result<String, String> {
    app_config().map(|c| c.api_base_url)
}

pub fn oauth_redirect_hostname() -> String {
    app_config()
        .ok()
        .and_then(|c| c.oauth_redirect_hostname)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_OAUTH_REDIRECT_HOSTNAME.to_string())
}

pub fn discord_client_id() -> String {
    app_config()
        .ok()
        .and_then(|c| c.discord_client_id)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_DISCORD_CLIENT_ID.to_string())
}

/// Autoplay defaults to on when the key is absent.
pub fn autoplay_enabled() -> bool {
    match app_config().ok().and_then(|c| c.autoplay) {
        Some(value) => truthy(Some(value.as_str())),
        None => true,
    }
}

pub fn scroll_max() -> u32 {
    app_config()
        .ok()
        .and_then(|c| c.scroll_max)
        .filter(|max| *max > 0)
        .unwrap_or(DEFAULT_SCROLL_MAX)
}

pub fn scroll_invert() -> bool {
    app_config()
        .ok()
        .map(|c| truthy(c.scroll_invert.as_deref()))
        .unwrap_or(false)
}

pub fn viewport_settings() -> ViewportSettings {
    ViewportSettings {
        autoplay: autoplay_enabled(),
        scroll: scroll_max(),
        scroll_invert: scroll_invert(),
    }
}

pub fn account_api_client() -> Result<AccountApiClient, String> {
    Ok(AccountApiClient::new(&api_base_url()?))
}

pub fn identity_client() -> Result<IdentityClient, String> {
    let config = app_config()?;
    if config.identity_api_key.is_empty() {
        return Err("identityApiKey is empty".to_string());
    }
    Ok(IdentityClient::with_endpoints(
        &config.identity_api_key,
        config
            .identity_base_url
            .as_deref()
            .unwrap_or(DEFAULT_IDENTITY_BASE_URL),
        config
            .secure_token_base_url
            .as_deref()
            .unwrap_or(DEFAULT_SECURE_TOKEN_BASE_URL),
    ))
}

/// Build the Discord OAuth authorize URL. The callback page lives at
/// `<redirect_host>/discord/auth`.
pub fn discord_authorize_url(client_id: &str, redirect_host: &str) -> String {
    format!(
        "https://discord.com/api/oauth2/authorize?client_id={}&redirect_uri={}%2Fdiscord%2Fauth&response_type=token&scope=identify",
        client_id,
        urlencoding::encode(redirect_host)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn authorize_url_encodes_redirect_host() {
        let url = discord_authorize_url(DEFAULT_DISCORD_CLIENT_ID, DEFAULT_OAUTH_REDIRECT_HOSTNAME);
        assert_eq!(
            url,
            "https://discord.com/api/oauth2/authorize?client_id=1071707916719095908\
             &redirect_uri=https%3A%2F%2Fwww.watchparty.me%2Fdiscord%2Fauth\
             &response_type=token&scope=identify"
        );
    }
}
