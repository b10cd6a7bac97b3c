// SPDX-License-Identifier: MIT OR Apache-2.0

//! State shapes held by the viewport store.

use web_sys::MediaStream;

/// The remote desktop's reported pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub rate: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            rate: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoState {
    /// 0..=100
    pub volume: u8,
    pub muted: bool,
    pub stream: Option<MediaStream>,
    pub playing: bool,
    pub playable: bool,
    pub resolution: Resolution,
}

impl Default for VideoState {
    fn default() -> Self {
        Self {
            volume: 100,
            muted: false,
            stream: None,
            playing: false,
            playable: false,
            resolution: Resolution::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteState {
    pub hosting: bool,
    pub locked: bool,
    /// Last clipboard text known to be shared with the remote.
    pub clipboard: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSettings {
    pub autoplay: bool,
    /// Largest wheel delta forwarded per event, per axis.
    pub scroll: u32,
    pub scroll_invert: bool,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            autoplay: true,
            scroll: 10,
            scroll_invert: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportState {
    pub video: VideoState,
    pub remote: RemoteState,
    pub settings: ViewportSettings,
    /// The session is live (connected and the user has interacted).
    pub active: bool,
    pub admin: bool,
}

/// What changed in a store commit. Subscribers re-read the store for the
/// new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Volume,
    Muted,
    Stream,
    Playing,
    Playable,
    Resolution,
    Hosting,
    Locked,
    Clipboard,
    Settings,
    Active,
    Admin,
}
