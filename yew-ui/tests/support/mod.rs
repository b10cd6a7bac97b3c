// Copyright 2025 Security Union LLC
// Licensed under MIT OR Apache-2.0
//
// Shared test harness for watchparty-ui component tests.
//
// Provides mount/cleanup helpers, runtime config injection, synthetic DOM
// events and a recording input sink so that individual test files stay
// focused on assertions rather than boilerplate.
//
// Each test file that does `mod support;` compiles its own copy, so not every
// function is used in every compilation unit.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use watchparty_types::RemoteInput;
use watchparty_ui::transport::{InputSinkHandle, RemoteInputSink};
use web_sys::{
    Event, EventInit, KeyboardEvent, KeyboardEventInit, MouseEvent, MouseEventInit, WheelEvent,
    WheelEventInit,
};

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

/// Create a fresh `<div>`, attach it to `<body>`, and return it.
pub fn create_mount_point() -> web_sys::Element {
    let document = gloo_utils::document();
    let div = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

/// Remove the mount-point from `<body>` so subsequent tests start clean.
pub fn cleanup(mount: &web_sys::Element) {
    gloo_utils::document()
        .body()
        .unwrap()
        .remove_child(mount)
        .ok();
}

pub fn query(mount: &web_sys::Element, selector: &str) -> web_sys::Element {
    mount
        .query_selector(selector)
        .unwrap()
        .unwrap_or_else(|| panic!("missing element {selector}"))
}

// ---------------------------------------------------------------------------
// Runtime config injection
// ---------------------------------------------------------------------------

/// Inject a `window.__APP_CONFIG` pointing every service at an unroutable
/// test host.
pub fn inject_app_config() {
    let config = js_sys::Object::new();
    let set = |key: &str, val: &wasm_bindgen::JsValue| {
        js_sys::Reflect::set(&config, &key.into(), val).unwrap();
    };
    set("apiBaseUrl", &"http://test:8080".into());
    set("identityApiKey", &"test-key".into());
    set("identityBaseUrl", &"http://test:8081".into());
    set("secureTokenBaseUrl", &"http://test:8082".into());
    set("oauthRedirectHostname", &"https://watch.test".into());
    set("autoplay", &"true".into());
    set("scrollMax", &wasm_bindgen::JsValue::from(10));

    let frozen = js_sys::Object::freeze(&config);
    let window = gloo_utils::window();
    js_sys::Reflect::set(&window, &"__APP_CONFIG".into(), &frozen).unwrap();
}

/// Remove `window.__APP_CONFIG` so tests don't leak state.
pub fn remove_app_config() {
    let window = gloo_utils::window();
    let _ = js_sys::Reflect::delete_property(&window.into(), &"__APP_CONFIG".into());
}

// ---------------------------------------------------------------------------
// Synthetic events
// ---------------------------------------------------------------------------

pub fn mouse_event(kind: &str, client_x: i32, client_y: i32, button: i16) -> MouseEvent {
    let init = MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_client_x(client_x);
    init.set_client_y(client_y);
    init.set_button(button);
    MouseEvent::new_with_mouse_event_init_dict(kind, &init).unwrap()
}

pub fn wheel_event(client_x: i32, client_y: i32, delta_x: f64, delta_y: f64) -> WheelEvent {
    let init = WheelEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_client_x(client_x);
    init.set_client_y(client_y);
    init.set_delta_x(delta_x);
    init.set_delta_y(delta_y);
    WheelEvent::new_with_event_init_dict("wheel", &init).unwrap()
}

pub fn key_event(kind: &str, key_code: u32, key: &str) -> KeyboardEvent {
    let init = KeyboardEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_key_code(key_code);
    init.set_key(key);
    KeyboardEvent::new_with_keyboard_event_init_dict(kind, &init).unwrap()
}

pub fn plain_event(kind: &str) -> Event {
    let init = EventInit::new();
    init.set_bubbles(true);
    Event::new_with_event_init_dict(kind, &init).unwrap()
}

// ---------------------------------------------------------------------------
// Input sink
// ---------------------------------------------------------------------------

/// Records everything the viewport forwards.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub inputs: Rc<RefCell<Vec<RemoteInput>>>,
    pub clipboard: Rc<RefCell<Vec<String>>>,
}

impl RecordingSink {
    pub fn handle(&self) -> InputSinkHandle {
        InputSinkHandle::new(self.clone())
    }

    pub fn take(&self) -> Vec<RemoteInput> {
        std::mem::take(&mut *self.inputs.borrow_mut())
    }
}

impl RemoteInputSink for RecordingSink {
    fn send_data(&self, input: RemoteInput) {
        self.inputs.borrow_mut().push(input);
    }

    fn send_clipboard(&self, text: &str) {
        self.clipboard.borrow_mut().push(text.to_string());
    }
}
