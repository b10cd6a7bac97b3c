// SPDX-License-Identifier: MIT OR Apache-2.0

//! Player box geometry.
//!
//! The rendered player keeps the remote's aspect ratio regardless of the
//! `<video>` element's intrinsic size: the container gets a `max-width`
//! derived from the available height and an aspect spacer gets a
//! percentage `padding-bottom`.

/// Aspect ratio of the remote's logical resolution, reduced by the gcd
/// (1280×720 becomes 16:9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub horizontal: u32,
    pub vertical: u32,
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self {
            horizontal: 16,
            vertical: 9,
        }
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

impl AspectRatio {
    /// `None` when either side is zero.
    pub fn from_resolution(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let d = gcd(width, height);
        Some(Self {
            horizontal: width / d,
            vertical: height / d,
        })
    }
}

/// Height the aspect box is fitted into: the component's own height
/// normally, the player's in fullscreen.
pub fn player_height(fullscreen: bool, component_height: f64, player_height: f64) -> f64 {
    if fullscreen {
        player_height
    } else {
        component_height
    }
}

/// Style values that keep the player at the remote's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectBox {
    pub max_width_px: f64,
    pub padding_bottom_pct: f64,
}

impl AspectBox {
    pub fn compute(ratio: AspectRatio, height: f64) -> Self {
        let horizontal = f64::from(ratio.horizontal);
        let vertical = f64::from(ratio.vertical);
        Self {
            max_width_px: (horizontal / vertical) * height,
            padding_bottom_pct: (vertical / horizontal) * 100.0,
        }
    }

    pub fn max_width_css(&self) -> String {
        format!("{}px", self.max_width_px)
    }

    pub fn padding_bottom_css(&self) -> String {
        format!("{}%", self.padding_bottom_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn reduces_common_resolutions() {
        assert_eq!(
            AspectRatio::from_resolution(1280, 720),
            Some(AspectRatio {
                horizontal: 16,
                vertical: 9
            })
        );
        assert_eq!(
            AspectRatio::from_resolution(1024, 768),
            Some(AspectRatio {
                horizontal: 4,
                vertical: 3
            })
        );
        assert_eq!(
            AspectRatio::from_resolution(1366, 768),
            Some(AspectRatio {
                horizontal: 683,
                vertical: 384
            })
        );
        assert_eq!(AspectRatio::from_resolution(0, 720), None);
    }

    #[wasm_bindgen_test]
    fn box_matches_ratio_for_many_heights() {
        let ratios = [(16, 9), (4, 3), (21, 9), (9, 16), (1, 1), (683, 384)];
        let heights = [0.0, 1.0, 240.0, 719.5, 1080.0, 4321.0];
        for (h, v) in ratios {
            let ratio = AspectRatio {
                horizontal: h,
                vertical: v,
            };
            for height in heights {
                let b = AspectBox::compute(ratio, height);
                let expected_width = (f64::from(h) / f64::from(v)) * height;
                let expected_pad = (f64::from(v) / f64::from(h)) * 100.0;
                assert!((b.max_width_px - expected_width).abs() < 1e-9);
                assert!((b.padding_bottom_pct - expected_pad).abs() < 1e-9);
            }
        }
    }

    #[wasm_bindgen_test]
    fn css_values() {
        let b = AspectBox::compute(AspectRatio::default(), 360.0);
        assert_eq!(b.max_width_css(), "640px");
        assert_eq!(b.padding_bottom_css(), "56.25%");
    }

    #[wasm_bindgen_test]
    fn fullscreen_uses_player_height() {
        assert_eq!(player_height(false, 400.0, 1080.0), 400.0);
        assert_eq!(player_height(true, 400.0, 1080.0), 1080.0);
    }
}
