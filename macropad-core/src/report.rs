//! 6KRO boot keyboard report folded from register/unregister events

use crate::keycode::Keycode;

/// Modifier bitmask plus up to six pressed keys
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifiers: u8,
    pub keys: [u8; 6],
}

impl KeyboardReport {
    /// Apply one register (`pressed`) or unregister event
    pub fn apply(&mut self, key: Keycode, pressed: bool) {
        let code = key.code();
        if key.is_modifier() {
            let bit = 1 << (code - 0xE0);
            if pressed {
                self.modifiers |= bit;
            } else {
                self.modifiers &= !bit;
            }
            return;
        }

        if pressed {
            if self.keys.contains(&code) {
                return;
            }
            // More than six keys are dropped
            if let Some(slot) = self.keys.iter_mut().find(|k| **k == 0) {
                *slot = code;
            }
        } else if let Some(slot) = self.keys.iter_mut().find(|k| **k == code) {
            *slot = 0;
        }
    }

    pub fn contains(&self, key: Keycode) -> bool {
        if key.is_modifier() {
            self.modifiers & (1 << (key.code() - 0xE0)) != 0
        } else {
            self.keys.contains(&key.code())
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
