// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-code normalization and held-key tracking.

use std::collections::BTreeSet;

/// Map Gecko's legacy key codes for `;`, `=` and `-` to the codes every
/// other engine reports. The character check keeps unrelated keys that
/// happen to share a code untouched.
pub fn normalize_key_code(code: u32, key: &str) -> u32 {
    match (code, key) {
        (59, ";" | ":") => 186,
        (61, "=" | "+") => 187,
        (173, "-" | "_") => 189,
        _ => code,
    }
}

/// Keys currently held down on the remote side, as far as we told it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeldKeys {
    keys: BTreeSet<u32>,
}

impl HeldKeys {
    pub fn press(&mut self, key: u32) {
        self.keys.insert(key);
    }

    pub fn release(&mut self, key: u32) {
        self.keys.remove(&key);
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Empty the set, returning every key that still needs a key-up.
    pub fn release_all(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.keys).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn remaps_only_with_matching_character() {
        assert_eq!(normalize_key_code(59, ";"), 186);
        assert_eq!(normalize_key_code(59, ":"), 186);
        assert_eq!(normalize_key_code(61, "="), 187);
        assert_eq!(normalize_key_code(61, "+"), 187);
        assert_eq!(normalize_key_code(173, "-"), 189);
        assert_eq!(normalize_key_code(173, "_"), 189);

        assert_eq!(normalize_key_code(59, "a"), 59);
        assert_eq!(normalize_key_code(61, "-"), 61);
        assert_eq!(normalize_key_code(173, "AudioVolumeMute"), 173);
    }

    #[wasm_bindgen_test]
    fn other_codes_pass_through() {
        for code in [0u32, 8, 13, 16, 65, 186, 187, 189, 255] {
            for key in [";", "=", "-", "a", ""] {
                assert_eq!(normalize_key_code(code, key), code);
            }
        }
    }

    #[wasm_bindgen_test]
    fn release_all_yields_each_key_once_and_empties() {
        let mut held = HeldKeys::default();
        held.press(65);
        held.press(16);
        held.press(65);
        held.press(186);
        held.release(16);
        assert_eq!(held.len(), 2);

        let released = held.release_all();
        assert_eq!(released, vec![65, 186]);
        assert!(held.is_empty());
        assert!(held.release_all().is_empty());
    }
}
