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

//! Shared wire types for the watchparty browser UI.
//!
//! This crate defines the contract between the UI and its collaborators:
//! the account backend (linked third-party accounts, account deletion) and
//! the remote host that receives forwarded input over a data channel.
//! It is framework-agnostic. Nothing here depends on Yew or web-sys.

pub mod account;
pub mod remote_input;

pub use account::{LinkAccount, LinkKind};
pub use remote_input::{decode_frame, encode_frame, FrameError, InputKind, RemoteInput};

/// Interpret a configuration string as a boolean flag.
///
/// `"true"` and `"1"` (case-insensitive) are truthy; anything else,
/// including a missing value, is false.
pub fn truthy(s: Option<&str>) -> bool {
    if let Some(s) = s {
        ["true".to_string(), "1".to_string()].contains(&s.to_lowercase())
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::truthy;

    #[test]
    fn truthy_accepts_true_and_one() {
        assert!(truthy(Some("true")));
        assert!(truthy(Some("TRUE")));
        assert!(truthy(Some("1")));
    }

    #[test]
    fn truthy_rejects_everything_else() {
        assert!(!truthy(None));
        assert!(!truthy(Some("")));
        assert!(!truthy(Some("yes")));
        assert!(!truthy(Some("0")));
    }
}
