// SPDX-License-Identifier: MIT OR Apache-2.0

//! Playability state, autoplay policy and focus-driven clipboard sync.
//!
//! The store owns `playable`/`playing`; the viewport only mirrors them into
//! the `<video>` element and reports media events back.

/// `NotPlayable -> Paused -> Playing -> NotPlayable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    NotPlayable,
    Paused,
    Playing,
}

impl PlaybackState {
    pub fn from_flags(playable: bool, playing: bool) -> Self {
        match (playable, playing) {
            (false, _) => PlaybackState::NotPlayable,
            (true, false) => PlaybackState::Paused,
            (true, true) => PlaybackState::Playing,
        }
    }

    /// The big play button shows while the stream can play but isn't.
    pub fn shows_play_button(&self) -> bool {
        matches!(self, PlaybackState::Paused)
    }
}

/// What to do once the stream becomes decodable with autoplay on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autoplay {
    /// Browsers block audible autoplay for absent users; mute first.
    pub force_mute: bool,
}

/// `None` when autoplay is off. Otherwise play, muting first unless the
/// user is present (document focused and session active).
pub fn autoplay_decision(
    autoplay: bool,
    document_focused: bool,
    session_active: bool,
) -> Option<Autoplay> {
    if !autoplay {
        return None;
    }
    Some(Autoplay {
        force_mute: !document_focused || !session_active,
    })
}

/// The text to push to the remote after reading the local clipboard, if
/// it changed since the last sync.
pub fn clipboard_update(last_known: &str, read: String) -> Option<String> {
    if read != last_known {
        Some(read)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn state_from_flags() {
        assert_eq!(PlaybackState::from_flags(false, false), PlaybackState::NotPlayable);
        assert_eq!(PlaybackState::from_flags(false, true), PlaybackState::NotPlayable);
        assert_eq!(PlaybackState::from_flags(true, false), PlaybackState::Paused);
        assert_eq!(PlaybackState::from_flags(true, true), PlaybackState::Playing);
        assert!(PlaybackState::Paused.shows_play_button());
        assert!(!PlaybackState::NotPlayable.shows_play_button());
    }

    #[wasm_bindgen_test]
    fn autoplay_mutes_unless_user_present() {
        assert_eq!(autoplay_decision(false, false, false), None);
        assert_eq!(autoplay_decision(false, true, true), None);
        assert_eq!(
            autoplay_decision(true, false, true),
            Some(Autoplay { force_mute: true })
        );
        assert_eq!(
            autoplay_decision(true, true, false),
            Some(Autoplay { force_mute: true })
        );
        assert_eq!(
            autoplay_decision(true, true, true),
            Some(Autoplay { force_mute: false })
        );
    }

    #[wasm_bindgen_test]
    fn clipboard_only_pushes_changes() {
        assert_eq!(clipboard_update("abc", "abc".to_string()), None);
        assert_eq!(clipboard_update("abc", "abd".to_string()), Some("abd".to_string()));
        assert_eq!(clipboard_update("", String::new()), None);
    }
}
