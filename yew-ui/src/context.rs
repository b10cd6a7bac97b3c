// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context providers for the application
//!
//! This module centralises shared state that needs to be accessed across
//! the component tree through Yew's `ContextProvider`.

use std::cell::RefCell;
use std::rc::Rc;
use web_sys::MediaStream;
use yew::prelude::*;

use crate::auth::AuthSession;
use crate::types::{RemoteState, Resolution, StoreChange, VideoState, ViewportSettings, ViewportState};
use crate::viewport::AspectRatio;

/// The signed-in session, `None` when signed out.
pub type SessionCtx = UseStateHandle<Option<AuthSession>>;

// -----------------------------------------------------------------------------
// Viewport store
// -----------------------------------------------------------------------------

#[derive(Debug)]
struct ViewportStoreInner {
    state: ViewportState,
    /// Last valid ratio; a zero-sized resolution keeps the previous one.
    aspect: AspectRatio,
    subscribers: Vec<(usize, Callback<StoreChange>)>,
    next_subscriber_id: usize,
}

/// Remote session state shared by the viewport and the embedding bridge.
///
/// Writers call the typed setters; every setter that actually changes a
/// value notifies subscribers with a [`StoreChange`], in commit order and
/// outside the internal borrow so subscribers may read or write the store.
#[derive(Clone, Debug)]
pub struct ViewportStore {
    inner: Rc<RefCell<ViewportStoreInner>>,
}

impl PartialEq for ViewportStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for ViewportStore {
    fn default() -> Self {
        Self::new(ViewportSettings::default())
    }
}

impl ViewportStore {
    pub fn new(settings: ViewportSettings) -> Self {
        let state = ViewportState {
            settings,
            ..Default::default()
        };
        let aspect = AspectRatio::from_resolution(
            state.video.resolution.width,
            state.video.resolution.height,
        )
        .unwrap_or_default();
        Self {
            inner: Rc::new(RefCell::new(ViewportStoreInner {
                state,
                aspect,
                subscribers: Vec::new(),
                next_subscriber_id: 0,
            })),
        }
    }

    /// Subscribe to changes. Returns subscription ID for unsubscribing.
    pub fn subscribe(&self, callback: Callback<StoreChange>) -> usize {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.push((id, callback));
        id
    }

    pub fn unsubscribe(&self, id: usize) {
        self.inner
            .borrow_mut()
            .subscribers
            .retain(|(sub_id, _)| *sub_id != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn commit<F>(&self, mutate: F)
    where
        F: FnOnce(&mut ViewportStoreInner, &mut Vec<StoreChange>),
    {
        let mut changes = Vec::new();
        let subscribers: Vec<_> = {
            let mut inner = self.inner.borrow_mut();
            mutate(&mut *inner, &mut changes);
            if changes.is_empty() {
                return;
            }
            inner.subscribers.clone()
        };

        for change in changes {
            for (_, callback) in &subscribers {
                callback.emit(change);
            }
        }
    }

    // --- reads ---------------------------------------------------------------

    pub fn video(&self) -> VideoState {
        self.inner.borrow().state.video.clone()
    }

    pub fn remote(&self) -> RemoteState {
        self.inner.borrow().state.remote.clone()
    }

    pub fn settings(&self) -> ViewportSettings {
        self.inner.borrow().state.settings
    }

    pub fn resolution(&self) -> Resolution {
        self.inner.borrow().state.video.resolution
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.inner.borrow().aspect
    }

    pub fn active(&self) -> bool {
        self.inner.borrow().state.active
    }

    pub fn admin(&self) -> bool {
        self.inner.borrow().state.admin
    }

    // --- video ---------------------------------------------------------------

    pub fn set_volume(&self, volume: u8) {
        let volume = volume.min(100);
        self.commit(|inner, changes| {
            if inner.state.video.volume != volume {
                inner.state.video.volume = volume;
                changes.push(StoreChange::Volume);
            }
        });
    }

    pub fn set_muted(&self, muted: bool) {
        self.commit(|inner, changes| {
            if inner.state.video.muted != muted {
                inner.state.video.muted = muted;
                changes.push(StoreChange::Muted);
            }
        });
    }

    pub fn set_stream(&self, stream: Option<MediaStream>) {
        self.commit(|inner, changes| {
            if inner.state.video.stream != stream {
                inner.state.video.stream = stream;
                changes.push(StoreChange::Stream);
            }
        });
    }

    /// Losing playability also stops playback.
    pub fn set_playable(&self, playable: bool) {
        self.commit(|inner, changes| {
            let video = &mut inner.state.video;
            if !playable && video.playing {
                video.playing = false;
                changes.push(StoreChange::Playing);
            }
            if video.playable != playable {
                video.playable = playable;
                changes.push(StoreChange::Playable);
            }
        });
    }

    /// Request playback; ignored until the stream is playable.
    pub fn play(&self) {
        self.commit(|inner, changes| {
            let video = &mut inner.state.video;
            if video.playable && !video.playing {
                video.playing = true;
                changes.push(StoreChange::Playing);
            }
        });
    }

    pub fn pause(&self) {
        self.commit(|inner, changes| {
            let video = &mut inner.state.video;
            if video.playable && video.playing {
                video.playing = false;
                changes.push(StoreChange::Playing);
            }
        });
    }

    pub fn set_resolution(&self, resolution: Resolution) {
        self.commit(|inner, changes| {
            if inner.state.video.resolution != resolution {
                inner.state.video.resolution = resolution;
                if let Some(aspect) =
                    AspectRatio::from_resolution(resolution.width, resolution.height)
                {
                    inner.aspect = aspect;
                }
                changes.push(StoreChange::Resolution);
            }
        });
    }

    // --- remote --------------------------------------------------------------

    pub fn set_hosting(&self, hosting: bool) {
        self.commit(|inner, changes| {
            if inner.state.remote.hosting != hosting {
                inner.state.remote.hosting = hosting;
                changes.push(StoreChange::Hosting);
            }
        });
    }

    pub fn set_locked(&self, locked: bool) {
        self.commit(|inner, changes| {
            if inner.state.remote.locked != locked {
                inner.state.remote.locked = locked;
                changes.push(StoreChange::Locked);
            }
        });
    }

    pub fn set_clipboard(&self, text: String) {
        self.commit(|inner, changes| {
            if inner.state.remote.clipboard != text {
                inner.state.remote.clipboard = text;
                changes.push(StoreChange::Clipboard);
            }
        });
    }

    // --- session -------------------------------------------------------------

    pub fn set_settings(&self, settings: ViewportSettings) {
        self.commit(|inner, changes| {
            if inner.state.settings != settings {
                inner.state.settings = settings;
                changes.push(StoreChange::Settings);
            }
        });
    }

    pub fn set_active(&self, active: bool) {
        self.commit(|inner, changes| {
            if inner.state.active != active {
                inner.state.active = active;
                changes.push(StoreChange::Active);
            }
        });
    }

    pub fn set_admin(&self, admin: bool) {
        self.commit(|inner, changes| {
            if inner.state.admin != admin {
                inner.state.admin = admin;
                changes.push(StoreChange::Admin);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn recorder(store: &ViewportStore) -> (usize, Rc<RefCell<Vec<StoreChange>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(Callback::from(move |change| sink.borrow_mut().push(change)));
        (id, seen)
    }

    #[wasm_bindgen_test]
    fn notifies_in_commit_order_and_only_on_change() {
        let store = ViewportStore::default();
        let (_, seen) = recorder(&store);

        store.set_volume(50);
        store.set_volume(50);
        store.set_muted(true);
        store.set_hosting(true);
        store.set_hosting(true);
        store.set_clipboard("hi".into());

        assert_eq!(
            *seen.borrow(),
            vec![
                StoreChange::Volume,
                StoreChange::Muted,
                StoreChange::Hosting,
                StoreChange::Clipboard
            ]
        );
        assert_eq!(store.video().volume, 50);
        assert_eq!(store.remote().clipboard, "hi");
    }

    #[wasm_bindgen_test]
    fn play_requires_playable_and_unplayable_stops() {
        let store = ViewportStore::default();
        let (_, seen) = recorder(&store);

        store.play();
        assert!(!store.video().playing);

        store.set_playable(true);
        store.play();
        assert!(store.video().playing);

        store.set_playable(false);
        let video = store.video();
        assert!(!video.playing);
        assert!(!video.playable);

        assert_eq!(
            *seen.borrow(),
            vec![
                StoreChange::Playable,
                StoreChange::Playing,
                StoreChange::Playing,
                StoreChange::Playable
            ]
        );
    }

    #[wasm_bindgen_test]
    fn resolution_updates_aspect_but_zero_keeps_previous() {
        let store = ViewportStore::default();
        assert_eq!(store.aspect_ratio(), AspectRatio::default());

        store.set_resolution(Resolution {
            width: 1024,
            height: 768,
            rate: 30,
        });
        assert_eq!(
            store.aspect_ratio(),
            AspectRatio {
                horizontal: 4,
                vertical: 3
            }
        );

        store.set_resolution(Resolution {
            width: 0,
            height: 0,
            rate: 30,
        });
        assert_eq!(store.aspect_ratio().horizontal, 4);
    }

    #[wasm_bindgen_test]
    fn unsubscribe_stops_delivery() {
        let store = ViewportStore::default();
        let (id, seen) = recorder(&store);
        assert_eq!(store.subscriber_count(), 1);
        store.unsubscribe(id);
        store.set_locked(true);
        assert!(seen.borrow().is_empty());
        assert_eq!(store.subscriber_count(), 0);
    }

    #[wasm_bindgen_test]
    fn subscriber_may_write_back() {
        let store = ViewportStore::default();
        let writer = store.clone();
        store.subscribe(Callback::from(move |change| {
            if change == StoreChange::Playable && writer.video().playable {
                writer.play();
            }
        }));
        store.set_playable(true);
        assert!(store.video().playing);
    }
}
