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

//! Delivery of forwarded input to the remote host.
//!
//! The viewport only knows [`RemoteInputSink`]; ordering and delivery are
//! the transport's business.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use watchparty_types::{encode_frame, RemoteInput};
use web_sys::{RtcDataChannel, RtcDataChannelState};
use yew::Callback;

/// Receives normalized input and clipboard pushes from the viewport.
pub trait RemoteInputSink {
    /// The `sendData(kind, payload)` of the remote session.
    fn send_data(&self, input: RemoteInput);

    /// Share local clipboard text with the remote.
    fn send_clipboard(&self, text: &str);
}

/// Shared handle to a sink, comparable by identity so it can live in props.
#[derive(Clone)]
pub struct InputSinkHandle(pub Rc<dyn RemoteInputSink>);

impl InputSinkHandle {
    pub fn new<S: RemoteInputSink + 'static>(sink: S) -> Self {
        Self(Rc::new(sink))
    }

    pub fn send_data(&self, input: RemoteInput) {
        self.0.send_data(input);
    }

    pub fn send_clipboard(&self, text: &str) {
        self.0.send_clipboard(text);
    }
}

impl PartialEq for InputSinkHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for InputSinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InputSinkHandle")
    }
}

/// Sends input as binary frames over an `RTCDataChannel` attached by the
/// embedding page once the peer connection is up.
#[derive(Clone)]
pub struct DataChannelSink {
    channel: Rc<RefCell<Option<RtcDataChannel>>>,
    on_clipboard: Callback<String>,
}

impl DataChannelSink {
    /// `on_clipboard` carries clipboard text over the signalling path, which
    /// the data channel does not handle.
    pub fn new(on_clipboard: Callback<String>) -> Self {
        Self {
            channel: Rc::new(RefCell::new(None)),
            on_clipboard,
        }
    }

    pub fn attach(&self, channel: RtcDataChannel) {
        log::info!("Input data channel attached: {}", channel.label());
        *self.channel.borrow_mut() = Some(channel);
    }

    pub fn detach(&self) {
        self.channel.borrow_mut().take();
    }
}

impl RemoteInputSink for DataChannelSink {
    fn send_data(&self, input: RemoteInput) {
        let channel = self.channel.borrow();
        let Some(channel) = channel.as_ref() else {
            log::debug!("Dropping {} with no data channel", input.kind());
            return;
        };
        if channel.ready_state() != RtcDataChannelState::Open {
            log::debug!("Dropping {}: data channel not open", input.kind());
            return;
        }
        if let Err(e) = channel.send_with_u8_array(&encode_frame(&input)) {
            log::error!("Failed to send {}: {e:?}", input.kind());
        }
    }

    fn send_clipboard(&self, text: &str) {
        self.on_clipboard.emit(text.to_string());
    }
}
