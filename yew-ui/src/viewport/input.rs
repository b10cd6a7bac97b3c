// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input gating and normalization.

/// The three conditions that decide whether local input reaches the remote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputGate {
    /// The local user currently drives the remote session.
    pub hosting: bool,
    /// Remote input is disabled session-wide.
    pub locked: bool,
    /// The capture overlay has input focus (pointer is over it).
    pub focused: bool,
}

impl InputGate {
    /// Mouse move/down/up and wheel.
    pub fn allows_pointer(&self) -> bool {
        self.hosting && !self.locked
    }

    pub fn allows_keyboard(&self) -> bool {
        self.focused && self.allows_pointer()
    }

    /// Synthesized key-ups on focus loss. Overlay focus is not required:
    /// keys pressed while focused must still be released after the pointer
    /// has left.
    pub fn allows_release_all(&self) -> bool {
        self.allows_pointer()
    }
}

/// The overlay's bounding client rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Map client coordinates inside the overlay to the remote's logical pixel
/// space: `round((W / rect_w) * (client_x - left))`, clamped to `[0, W]`.
///
/// Returns `None` for a collapsed rectangle or an empty resolution.
pub fn normalize_pointer(
    rect: OverlayRect,
    client_x: f64,
    client_y: f64,
    resolution: (u32, u32),
) -> Option<(u16, u16)> {
    let (w, h) = resolution;
    if rect.width <= 0.0 || rect.height <= 0.0 || w == 0 || h == 0 {
        return None;
    }
    let w = f64::from(w.min(u32::from(u16::MAX)));
    let h = f64::from(h.min(u32::from(u16::MAX)));
    let x = ((w / rect.width) * (client_x - rect.left)).round().clamp(0.0, w);
    let y = ((h / rect.height) * (client_y - rect.top)).round().clamp(0.0, h);
    Some((x as u16, y as u16))
}

/// Apply optional inversion, then clamp each axis to `[-scroll_max, scroll_max]`.
/// Fractional trackpad deltas are truncated toward zero.
pub fn normalize_wheel(delta_x: f64, delta_y: f64, invert: bool, scroll_max: u32) -> (i16, i16) {
    let max = f64::from(scroll_max.min(i16::MAX as u32));
    let sign = if invert { -1.0 } else { 1.0 };
    let clamp = |d: f64| {
        if d.is_nan() {
            0
        } else {
            (d * sign).clamp(-max, max).trunc() as i16
        }
    };
    (clamp(delta_x), clamp(delta_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn rect() -> OverlayRect {
        OverlayRect {
            left: 100.0,
            top: 50.0,
            width: 640.0,
            height: 360.0,
        }
    }

    #[wasm_bindgen_test]
    fn gate_truth_table() {
        for hosting in [false, true] {
            for locked in [false, true] {
                for focused in [false, true] {
                    let gate = InputGate {
                        hosting,
                        locked,
                        focused,
                    };
                    assert_eq!(gate.allows_pointer(), hosting && !locked);
                    assert_eq!(gate.allows_keyboard(), hosting && !locked && focused);
                    assert_eq!(gate.allows_release_all(), hosting && !locked);
                }
            }
        }
    }

    #[wasm_bindgen_test]
    fn pointer_scales_to_logical_resolution() {
        assert_eq!(normalize_pointer(rect(), 420.0, 230.0, (1280, 720)), Some((640, 360)));
        assert_eq!(normalize_pointer(rect(), 100.0, 50.0, (1280, 720)), Some((0, 0)));
        assert_eq!(normalize_pointer(rect(), 740.0, 410.0, (1280, 720)), Some((1280, 720)));
    }

    #[wasm_bindgen_test]
    fn pointer_rounds_to_nearest() {
        // 1920/640 = 3 per css px; 0.4px -> 1.2 -> 1, 0.5px -> 1.5 -> 2
        assert_eq!(normalize_pointer(rect(), 100.4, 50.5, (1920, 1080)), Some((1, 2)));
    }

    #[wasm_bindgen_test]
    fn pointer_stays_within_bounds_at_and_past_edges() {
        let probes = [
            (99.0, 49.0),
            (100.0, 50.0),
            (739.999, 409.999),
            (740.0, 410.0),
            (741.5, 420.0),
            (-5000.0, 5000.0),
        ];
        for (cx, cy) in probes {
            let (x, y) = normalize_pointer(rect(), cx, cy, (1366, 768)).unwrap();
            assert!(x <= 1366);
            assert!(y <= 768);
        }
    }

    #[wasm_bindgen_test]
    fn degenerate_rect_yields_nothing() {
        let empty = OverlayRect {
            width: 0.0,
            ..rect()
        };
        assert_eq!(normalize_pointer(empty, 1.0, 1.0, (1280, 720)), None);
        assert_eq!(normalize_pointer(rect(), 1.0, 1.0, (0, 720)), None);
    }

    #[wasm_bindgen_test]
    fn wheel_clamps_both_axes() {
        assert_eq!(normalize_wheel(3.0, -4.0, false, 10), (3, -4));
        assert_eq!(normalize_wheel(250.0, -1e9, false, 10), (10, -10));
        assert_eq!(normalize_wheel(f64::INFINITY, f64::NEG_INFINITY, false, 7), (7, -7));
        assert_eq!(normalize_wheel(f64::NAN, 1.0, false, 7), (0, 1));
    }

    #[wasm_bindgen_test]
    fn wheel_inverts_before_clamping() {
        assert_eq!(normalize_wheel(3.0, -40.0, true, 10), (-3, 10));
        for max in [1u32, 5, 10, 100] {
            for d in [-1e6, -33.3, -0.5, 0.0, 0.7, 12.0, 1e6] {
                for invert in [false, true] {
                    let (x, y) = normalize_wheel(d, -d, invert, max);
                    let m = max as i16;
                    assert!((-m..=m).contains(&x));
                    assert!((-m..=m).contains(&y));
                }
            }
        }
    }
}
