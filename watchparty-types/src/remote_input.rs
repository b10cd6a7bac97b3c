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

//! Remote input messages forwarded from the viewer to the remote host.
//!
//! Coordinates are already normalized to the remote's logical resolution
//! and wheel deltas already clamped; this module only names and frames them.
//!
//! Data-channel frame layout (all integers little-endian):
//!
//! ```text
//! [opcode:1][payload_len:2][payload:N]
//!
//! MOVE     0x01  x:u16 y:u16
//! SCROLL   0x02  x:i16 y:i16
//! KEY_DOWN 0x03  key:u64
//! KEY_UP   0x04  key:u64
//! ```
//!
//! Mouse buttons share the key opcodes, carrying the button number as the
//! key, so the remote treats them like any other pressed code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const OP_MOVE: u8 = 0x01;
const OP_SCROLL: u8 = 0x02;
const OP_KEY_DOWN: u8 = 0x03;
const OP_KEY_UP: u8 = 0x04;

const HEADER_LEN: usize = 3;

/// The `sendData` kind of a forwarded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    MouseMove,
    MouseDown,
    MouseUp,
    Wheel,
    KeyDown,
    KeyUp,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::MouseMove => "mousemove",
            InputKind::MouseDown => "mousedown",
            InputKind::MouseUp => "mouseup",
            InputKind::Wheel => "wheel",
            InputKind::KeyDown => "keydown",
            InputKind::KeyUp => "keyup",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input event addressed to the remote host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum RemoteInput {
    MouseMove { x: u16, y: u16 },
    MouseDown { key: u32 },
    MouseUp { key: u32 },
    Wheel { x: i16, y: i16 },
    KeyDown { key: u32 },
    KeyUp { key: u32 },
}

impl RemoteInput {
    pub fn kind(&self) -> InputKind {
        match self {
            RemoteInput::MouseMove { .. } => InputKind::MouseMove,
            RemoteInput::MouseDown { .. } => InputKind::MouseDown,
            RemoteInput::MouseUp { .. } => InputKind::MouseUp,
            RemoteInput::Wheel { .. } => InputKind::Wheel,
            RemoteInput::KeyDown { .. } => InputKind::KeyDown,
            RemoteInput::KeyUp { .. } => InputKind::KeyUp,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),

    #[error("payload length {declared} does not match opcode 0x{opcode:02X}")]
    BadLength { opcode: u8, declared: usize },
}

/// Encode one input event as a data-channel frame.
pub fn encode_frame(input: &RemoteInput) -> Vec<u8> {
    let (opcode, payload): (u8, Vec<u8>) = match *input {
        RemoteInput::MouseMove { x, y } => {
            let mut p = Vec::with_capacity(4);
            p.extend_from_slice(&x.to_le_bytes());
            p.extend_from_slice(&y.to_le_bytes());
            (OP_MOVE, p)
        }
        RemoteInput::Wheel { x, y } => {
            let mut p = Vec::with_capacity(4);
            p.extend_from_slice(&x.to_le_bytes());
            p.extend_from_slice(&y.to_le_bytes());
            (OP_SCROLL, p)
        }
        RemoteInput::KeyDown { key } | RemoteInput::MouseDown { key } => {
            (OP_KEY_DOWN, u64::from(key).to_le_bytes().to_vec())
        }
        RemoteInput::KeyUp { key } | RemoteInput::MouseUp { key } => {
            (OP_KEY_UP, u64::from(key).to_le_bytes().to_vec())
        }
    };

    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.push(opcode);
    buf.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    buf.extend_from_slice(&payload);
    buf
}

/// Decode one frame from the start of `bytes`, returning the event and the
/// number of bytes consumed.
///
/// Button presses come back as [`RemoteInput::KeyDown`]/[`RemoteInput::KeyUp`]
/// since the frame does not distinguish them.
pub fn decode_frame(bytes: &[u8]) -> Result<(RemoteInput, usize), FrameError> {
    if bytes.len() < HEADER_LEN {
        return Err(FrameError::InsufficientData {
            needed: HEADER_LEN,
            available: bytes.len(),
        });
    }
    let opcode = bytes[0];
    let declared = u16::from_le_bytes([bytes[1], bytes[2]]) as usize;

    let expected = match opcode {
        OP_MOVE | OP_SCROLL => 4,
        OP_KEY_DOWN | OP_KEY_UP => 8,
        other => return Err(FrameError::UnknownOpcode(other)),
    };
    if declared != expected {
        return Err(FrameError::BadLength { opcode, declared });
    }
    let total = HEADER_LEN + declared;
    if bytes.len() < total {
        return Err(FrameError::InsufficientData {
            needed: total,
            available: bytes.len(),
        });
    }

    let p = &bytes[HEADER_LEN..total];
    let input = match opcode {
        OP_MOVE => RemoteInput::MouseMove {
            x: u16::from_le_bytes([p[0], p[1]]),
            y: u16::from_le_bytes([p[2], p[3]]),
        },
        OP_SCROLL => RemoteInput::Wheel {
            x: i16::from_le_bytes([p[0], p[1]]),
            y: i16::from_le_bytes([p[2], p[3]]),
        },
        _ => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(p);
            // Key codes are u32 on the producing side.
            let key = u64::from_le_bytes(raw) as u32;
            if opcode == OP_KEY_DOWN {
                RemoteInput::KeyDown { key }
            } else {
                RemoteInput::KeyUp { key }
            }
        }
    };
    Ok((input, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_frame_layout() {
        let bytes = encode_frame(&RemoteInput::MouseMove { x: 640, y: 2 });
        assert_eq!(bytes, vec![0x01, 4, 0, 0x80, 0x02, 2, 0]);
    }

    #[test]
    fn scroll_frame_keeps_sign() {
        let bytes = encode_frame(&RemoteInput::Wheel { x: -10, y: 3 });
        assert_eq!(bytes[0], 0x02);
        let (decoded, used) = decode_frame(&bytes).unwrap();
        assert_eq!(decoded, RemoteInput::Wheel { x: -10, y: 3 });
        assert_eq!(used, 7);
    }

    #[test]
    fn mouse_buttons_share_key_opcodes() {
        let down = encode_frame(&RemoteInput::MouseDown { key: 2 });
        let up = encode_frame(&RemoteInput::MouseUp { key: 2 });
        assert_eq!(down[0], 0x03);
        assert_eq!(up[0], 0x04);
        assert_eq!(down.len(), 11);
        assert_eq!(decode_frame(&up).unwrap().0, RemoteInput::KeyUp { key: 2 });
    }

    #[test]
    fn decode_rejects_truncated_and_unknown() {
        assert_eq!(
            decode_frame(&[0x01, 4]),
            Err(FrameError::InsufficientData {
                needed: 3,
                available: 2
            })
        );
        assert_eq!(
            decode_frame(&[0x03, 8, 0, 1, 2]),
            Err(FrameError::InsufficientData {
                needed: 11,
                available: 5
            })
        );
        assert_eq!(decode_frame(&[0x09, 0, 0]), Err(FrameError::UnknownOpcode(0x09)));
        assert_eq!(
            decode_frame(&[0x01, 8, 0]),
            Err(FrameError::BadLength {
                opcode: 0x01,
                declared: 8
            })
        );
    }

    #[test]
    fn json_form_is_tagged_by_kind() {
        let json = serde_json::to_value(RemoteInput::KeyDown { key: 186 }).unwrap();
        assert_eq!(json, serde_json::json!({"event": "keydown", "key": 186}));
        let input = RemoteInput::MouseMove { x: 1, y: 2 };
        assert_eq!(input.kind().as_str(), "mousemove");
        let json = serde_json::to_value(input).unwrap();
        assert_eq!(json["event"], "mousemove");
    }
}
