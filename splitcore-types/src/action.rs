//! Keymap entries.
//!
//! A keymap slot either does nothing, reports a HID keycode, or triggers a firmware command.
//! On the raw byte level commands are the values at or above [`COMMAND_THRESHOLD`].
use crate::keycode::HidKeyCode;

/// Raw keymap bytes at or above this value are commands, never reported to the host.
pub const COMMAND_THRESHOLD: u8 = 0xF0;

/// Firmware commands that can be placed in a keymap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Flip between the default layer and the toggle layer, `0xF0`
    LayerToggle,
    /// Macro record key, `0xF1`
    MacroRecord,
    /// Macro play key, `0xF2`
    MacroPlay,
    /// Program mode key, `0xF3`
    ProgramMode,
    /// Any other command byte. Consumed like a command but does nothing.
    Reserved(u8),
}

impl Command {
    /// Decode a command byte, `code` is expected to be at or above [`COMMAND_THRESHOLD`].
    pub const fn from_code(code: u8) -> Self {
        match code {
            0xF0 => Command::LayerToggle,
            0xF1 => Command::MacroRecord,
            0xF2 => Command::MacroPlay,
            0xF3 => Command::ProgramMode,
            other => Command::Reserved(other),
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Command::LayerToggle => 0xF0,
            Command::MacroRecord => 0xF1,
            Command::MacroPlay => 0xF2,
            Command::ProgramMode => 0xF3,
            Command::Reserved(code) => code,
        }
    }
}

/// A single keymap slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// No action, raw byte `0x00`
    #[default]
    No,
    /// Report a keycode while the key is pressed
    Key(HidKeyCode),
    /// Trigger a firmware command, never reported
    Command(Command),
}

impl KeyAction {
    /// Raw byte of this action
    pub const fn to_raw(self) -> u8 {
        match self {
            KeyAction::No => 0x00,
            KeyAction::Key(k) => k.as_u8(),
            KeyAction::Command(c) => c.code(),
        }
    }

    pub const fn is_command(&self) -> bool {
        matches!(self, KeyAction::Command(_))
    }
}

/// A raw keymap byte below [`COMMAND_THRESHOLD`] that is not a known keyboard usage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidKeyCode(pub u8);

impl TryFrom<u8> for KeyAction {
    type Error = InvalidKeyCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if code >= COMMAND_THRESHOLD {
            return Ok(KeyAction::Command(Command::from_code(code)));
        }
        match HidKeyCode::from_repr(code) {
            Some(HidKeyCode::No) => Ok(KeyAction::No),
            Some(key) => Ok(KeyAction::Key(key)),
            None => Err(InvalidKeyCode(code)),
        }
    }
}
