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

//! JavaScript entry points for the page's real-time layer.
//!
//! The peer connection and signalling live outside this crate. They push
//! remote state in through these exports, which write to the registered
//! [`ViewportStore`]; components never reach this module's globals.

use std::cell::RefCell;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::{MediaStream, RtcDataChannel};

use crate::context::ViewportStore;
use crate::transport::DataChannelSink;
use crate::types::Resolution;

thread_local! {
    static SHARED: RefCell<Option<Shared>> = const { RefCell::new(None) };
}

struct Shared {
    store: ViewportStore,
    sink: DataChannelSink,
    clipboard_handler: Option<Function>,
    resolution_handler: Option<Function>,
}

/// Make `store` and `sink` the targets of the exported setters.
pub fn register(store: ViewportStore, sink: DataChannelSink) {
    SHARED.with(|shared| {
        let mut shared = shared.borrow_mut();
        let (clipboard_handler, resolution_handler) = shared
            .take()
            .map(|old| (old.clipboard_handler, old.resolution_handler))
            .unwrap_or_default();
        *shared = Some(Shared {
            store,
            sink,
            clipboard_handler,
            resolution_handler,
        });
    });
}

pub fn unregister() {
    SHARED.with(|shared| shared.borrow_mut().take());
}

pub fn is_registered() -> bool {
    SHARED.with(|shared| shared.borrow().is_some())
}

fn with_store(op: &str, f: impl FnOnce(&ViewportStore)) {
    let store = SHARED.with(|shared| shared.borrow().as_ref().map(|s| s.store.clone()));
    match store {
        // The borrow is released before `f` runs; store subscribers may
        // call back into the bridge.
        Some(store) => f(&store),
        None => log::warn!("{op} called before the viewport was registered"),
    }
}

fn with_sink(op: &str, f: impl FnOnce(&DataChannelSink)) {
    let sink = SHARED.with(|shared| shared.borrow().as_ref().map(|s| s.sink.clone()));
    match sink {
        Some(sink) => f(&sink),
        None => log::warn!("{op} called before the viewport was registered"),
    }
}

fn call_handler(select: fn(&Shared) -> Option<Function>, arg: &JsValue) -> bool {
    let handler = SHARED.with(|shared| shared.borrow().as_ref().and_then(select));
    let Some(handler) = handler else {
        return false;
    };
    if let Err(e) = handler.call1(&JsValue::NULL, arg) {
        log::error!("Bridge handler threw: {e:?}");
    }
    true
}

/// Hand locally copied text to the page so it can relay it to the remote.
pub fn forward_clipboard(text: String) {
    if !call_handler(|s| s.clipboard_handler.clone(), &JsValue::from_str(&text)) {
        log::debug!("No clipboard handler registered, dropping clipboard update");
    }
}

/// The admin clicked the resolution button in the video menu.
pub fn request_resolution_menu() {
    if !call_handler(|s| s.resolution_handler.clone(), &JsValue::UNDEFINED) {
        log::debug!("No resolution handler registered");
    }
}

// -----------------------------------------------------------------------------
// Exports
// -----------------------------------------------------------------------------

#[wasm_bindgen(js_name = attachStream)]
pub fn attach_stream(stream: MediaStream) {
    with_store("attachStream", |store| store.set_stream(Some(stream)));
}

#[wasm_bindgen(js_name = detachStream)]
pub fn detach_stream() {
    with_store("detachStream", |store| store.set_stream(None));
}

#[wasm_bindgen(js_name = attachDataChannel)]
pub fn attach_data_channel(channel: RtcDataChannel) {
    with_sink("attachDataChannel", |sink| sink.attach(channel));
}

#[wasm_bindgen(js_name = detachDataChannel)]
pub fn detach_data_channel() {
    with_sink("detachDataChannel", |sink| sink.detach());
}

#[wasm_bindgen(js_name = setHosting)]
pub fn set_hosting(hosting: bool) {
    with_store("setHosting", |store| store.set_hosting(hosting));
}

#[wasm_bindgen(js_name = setLocked)]
pub fn set_locked(locked: bool) {
    with_store("setLocked", |store| store.set_locked(locked));
}

#[wasm_bindgen(js_name = setResolution)]
pub fn set_resolution(width: u32, height: u32, rate: u32) {
    with_store("setResolution", |store| {
        store.set_resolution(Resolution {
            width,
            height,
            rate,
        })
    });
}

/// Clipboard text received from the remote; written to the local clipboard.
#[wasm_bindgen(js_name = setRemoteClipboard)]
pub fn set_remote_clipboard(text: String) {
    with_store("setRemoteClipboard", |store| store.set_clipboard(text));
}

/// 0..=100; larger values are clamped.
#[wasm_bindgen(js_name = setVolume)]
pub fn set_volume(volume: u8) {
    with_store("setVolume", |store| store.set_volume(volume));
}

#[wasm_bindgen(js_name = setMuted)]
pub fn set_muted(muted: bool) {
    with_store("setMuted", |store| store.set_muted(muted));
}

#[wasm_bindgen(js_name = setSessionActive)]
pub fn set_session_active(active: bool) {
    with_store("setSessionActive", |store| store.set_active(active));
}

#[wasm_bindgen(js_name = setAdmin)]
pub fn set_admin(admin: bool) {
    with_store("setAdmin", |store| store.set_admin(admin));
}

/// `handler(text)` is called whenever the viewport picks up new local
/// clipboard text while hosting.
#[wasm_bindgen(js_name = onClipboard)]
pub fn on_clipboard(handler: Function) {
    SHARED.with(|shared| match shared.borrow_mut().as_mut() {
        Some(shared) => shared.clipboard_handler = Some(handler),
        None => log::warn!("onClipboard called before the viewport was registered"),
    });
}

/// `handler()` is called when an admin opens the resolution menu.
#[wasm_bindgen(js_name = onResolutionMenu)]
pub fn on_resolution_menu(handler: Function) {
    SHARED.with(|shared| match shared.borrow_mut().as_mut() {
        Some(shared) => shared.resolution_handler = Some(handler),
        None => log::warn!("onResolutionMenu called before the viewport was registered"),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use yew::Callback;

    #[wasm_bindgen_test]
    fn setters_write_to_registered_store() {
        let store = ViewportStore::default();
        register(store.clone(), DataChannelSink::new(Callback::noop()));
        assert!(is_registered());

        set_hosting(true);
        set_locked(true);
        set_volume(250);
        set_resolution(1024, 768, 60);
        set_remote_clipboard("copied".into());
        set_session_active(true);
        set_admin(true);

        let remote = store.remote();
        assert!(remote.hosting);
        assert!(remote.locked);
        assert_eq!(remote.clipboard, "copied");
        assert_eq!(store.video().volume, 100);
        assert_eq!(store.resolution().width, 1024);
        assert_eq!(store.aspect_ratio().horizontal, 4);
        assert!(store.active());
        assert!(store.admin());

        unregister();
        assert!(!is_registered());
    }

    #[wasm_bindgen_test]
    fn setters_before_registration_are_ignored() {
        unregister();
        set_hosting(true);
        detach_stream();
        detach_data_channel();
        assert!(!is_registered());
    }
}
