use crate::config::BehaviorConfig;
use crate::matrix::KeyGrid;
use crate::types::action::{Command, KeyAction};

/// Which half a key belongs to, seen from the primary half
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    /// The primary's own matrix
    Local = 0,
    /// The matrix of the other half, pulled over the split link
    Remote = 1,
}

/// Physical key position on the whole keyboard
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPos {
    pub half: Half,
    pub row: u8,
    pub col: u8,
}

impl KeyPos {
    pub const fn new(half: Half, row: u8, col: u8) -> Self {
        Self { half, row, col }
    }

    /// Flattened index over both halves, local keys first
    pub const fn flat_index<const ROW: usize, const COL: usize>(&self) -> usize {
        self.half as usize * ROW * COL + self.row as usize * COL + self.col as usize
    }
}

/// Pressed positions of both halves in scan order: local row-major, then remote row-major
pub fn pressed_positions<'g, const ROW: usize, const COL: usize>(
    local: &'g KeyGrid<ROW, COL>,
    remote: &'g KeyGrid<ROW, COL>,
) -> impl Iterator<Item = KeyPos> + 'g {
    let local = local
        .iter_pressed()
        .map(|(row, col)| KeyPos::new(Half::Local, row as u8, col as u8));
    let remote = remote
        .iter_pressed()
        .map(|(row, col)| KeyPos::new(Half::Remote, row as u8, col as u8));
    local.chain(remote)
}

/// Keymap of both halves, indexed by `[layer][half][row][col]`, plus the active layer.
pub struct KeyMap<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    /// Layers
    layers: &'a [[[[KeyAction; COL]; ROW]; 2]; NUM_LAYER],
    /// Current active layer
    active_layer: u8,
    /// Layer after boot and the layer toggled back to
    default_layer: u8,
    /// Layer the layer toggle key flips to
    toggle_layer: u8,
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> KeyMap<'a, ROW, COL, NUM_LAYER> {
    pub fn new(layers: &'a [[[[KeyAction; COL]; ROW]; 2]; NUM_LAYER], behavior: BehaviorConfig) -> Self {
        let default_layer = Self::checked_layer(behavior.default_layer, 0);
        let toggle_layer = Self::checked_layer(behavior.toggle_layer, default_layer);
        KeyMap {
            layers,
            active_layer: default_layer,
            default_layer,
            toggle_layer,
        }
    }

    fn checked_layer(layer: u8, fallback: u8) -> u8 {
        if (layer as usize) < NUM_LAYER {
            layer
        } else {
            warn!("Layer {} is out of range, using layer {}", layer, fallback);
            fallback
        }
    }

    /// Action at `pos` on the active layer
    pub fn action(&self, pos: KeyPos) -> KeyAction {
        self.action_at(self.active_layer, pos)
    }

    /// Action at `pos` on `layer`, out of range lookups are [`KeyAction::No`]
    pub fn action_at(&self, layer: u8, pos: KeyPos) -> KeyAction {
        self.layers
            .get(layer as usize)
            .and_then(|halves| halves.get(pos.half as usize))
            .and_then(|rows| rows.get(pos.row as usize))
            .and_then(|cols| cols.get(pos.col as usize))
            .copied()
            .unwrap_or(KeyAction::No)
    }

    pub fn active_layer(&self) -> u8 {
        self.active_layer
    }

    /// Flip between the default layer and the toggle layer
    pub fn toggle_layer(&mut self) {
        self.active_layer = if self.active_layer == self.default_layer {
            self.toggle_layer
        } else {
            self.default_layer
        };
    }

    /// Whether any pressed key maps to `command` on the active layer
    pub fn is_command_pressed(
        &self,
        command: Command,
        local: &KeyGrid<ROW, COL>,
        remote: &KeyGrid<ROW, COL>,
    ) -> bool {
        pressed_positions(local, remote).any(|pos| self.action(pos) == KeyAction::Command(command))
    }
}
