use heapless::Vec;

use crate::REPORT_SLOTS;
use crate::keymap::{KeyMap, pressed_positions};
use crate::matrix::KeyGrid;
use crate::types::action::{Command, KeyAction};
use crate::types::keycode::HidKeyCode;

/// Keycodes currently pressed, in scan order, at most [`REPORT_SLOTS`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Report {
    keycodes: Vec<HidKeyCode, REPORT_SLOTS>,
}

impl Report {
    pub const fn new() -> Self {
        Self { keycodes: Vec::new() }
    }

    /// Append a keycode, returns `false` if the report is full.
    pub fn push(&mut self, keycode: HidKeyCode) -> bool {
        self.keycodes.push(keycode).is_ok()
    }

    pub fn is_full(&self) -> bool {
        self.keycodes.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.keycodes.is_empty()
    }

    pub fn keycodes(&self) -> &[HidKeyCode] {
        &self.keycodes
    }

    /// Fixed slots, unused slots are `0`
    pub fn slots(&self) -> [u8; REPORT_SLOTS] {
        let mut slots = [0; REPORT_SLOTS];
        for (slot, key) in slots.iter_mut().zip(self.keycodes.iter()) {
            *slot = key.as_u8();
        }
        slots
    }
}

/// Build the report of all pressed keys of both halves.
///
/// Keys are resolved one by one in scan order against the keymap's active layer:
/// - `LayerToggle` flips the active layer right away, so keys scanned after it use the new layer,
/// - other commands and empty slots are consumed,
/// - keycodes are appended.
///
/// The walk stops as soon as the report is full. Keys after that, commands included, are not resolved.
pub fn build_report<const ROW: usize, const COL: usize, const NUM_LAYER: usize>(
    keymap: &mut KeyMap<'_, ROW, COL, NUM_LAYER>,
    local: &KeyGrid<ROW, COL>,
    remote: &KeyGrid<ROW, COL>,
) -> Report {
    let mut report = Report::new();
    for pos in pressed_positions(local, remote) {
        if report.is_full() {
            break;
        }
        match keymap.action(pos) {
            KeyAction::Key(HidKeyCode::No) | KeyAction::No => {}
            KeyAction::Key(keycode) => {
                report.push(keycode);
            }
            KeyAction::Command(Command::LayerToggle) => {
                keymap.toggle_layer();
                info!("Layer toggled to {}", keymap.active_layer());
            }
            KeyAction::Command(_) => {}
        }
    }
    report
}
