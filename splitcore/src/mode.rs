//! Keyboard mode state machine.
//!
//! Runs once per cycle on the merged key states of both halves. It only reads key states;
//! which mode is active decides whether the cycle's report carries keys at all.
//!
//! Every mode change that needs a key combination goes through [`Mode::Waiting`] first,
//! which holds until every key on both halves is released.
use crate::keymap::{KeyMap, KeyPos, pressed_positions};
use crate::matrix::KeyGrid;
use crate::types::action::{Command, KeyAction};

/// Mode entered once every key is released
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pending {
    Normal,
    ProgrammingSource,
    ProgrammingDestination,
    MacroRecordTrigger,
    MacroRecord,
}

impl From<Pending> for Mode {
    fn from(pending: Pending) -> Self {
        match pending {
            Pending::Normal => Mode::Normal,
            Pending::ProgrammingSource => Mode::ProgrammingSource,
            Pending::ProgrammingDestination => Mode::ProgrammingDestination,
            Pending::MacroRecordTrigger => Mode::MacroRecordTrigger,
            Pending::MacroRecord => Mode::MacroRecord,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Keys are reported
    #[default]
    Normal,
    /// Declared for layer switching, has no handler and falls back to `Normal`
    LayerSwitch,
    /// Waiting for the key to remap
    ProgrammingSource,
    /// Waiting for the key the source is remapped to
    ProgrammingDestination,
    /// Waiting for the first key of a macro
    MacroRecordTrigger,
    /// Keys are reported while being recorded
    MacroRecord,
    /// Reserved, no transition leads here
    MacroPlay,
    /// Waiting for every key to be released
    Waiting(Pending),
}

impl Mode {
    /// Whether reports carry the pressed keys in this mode
    pub fn emits_keys(&self) -> bool {
        matches!(self, Mode::Normal | Mode::MacroRecord)
    }
}

/// Per-cycle input of the state machine
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ModeInput {
    /// Pressed keys over both halves
    pub pressed_count: usize,
    /// The program mode key is pressed on the active layer
    pub program_pressed: bool,
    /// The macro record key is pressed on the active layer
    pub macro_record_pressed: bool,
    /// First pressed key in scan order and its action on the active layer
    pub first_pressed: Option<(KeyPos, KeyAction)>,
}

impl ModeInput {
    pub fn collect<const ROW: usize, const COL: usize, const NUM_LAYER: usize>(
        keymap: &KeyMap<'_, ROW, COL, NUM_LAYER>,
        local: &KeyGrid<ROW, COL>,
        remote: &KeyGrid<ROW, COL>,
    ) -> Self {
        ModeInput {
            pressed_count: local.pressed_count() + remote.pressed_count(),
            program_pressed: keymap.is_command_pressed(Command::ProgramMode, local, remote),
            macro_record_pressed: keymap.is_command_pressed(Command::MacroRecord, local, remote),
            first_pressed: pressed_positions(local, remote)
                .next()
                .map(|pos| (pos, keymap.action(pos))),
        }
    }
}

/// Key selected as remap source in programming mode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProgramSource {
    pub pos: KeyPos,
    pub action: KeyAction,
}

pub struct ModeMachine {
    mode: Mode,
    /// Macro recording in progress
    recording: bool,
    /// Remap source picked in `ProgrammingSource`
    program_source: Option<ProgramSource>,
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeMachine {
    pub const fn new() -> Self {
        Self {
            mode: Mode::Normal,
            recording: false,
            program_source: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn program_source(&self) -> Option<ProgramSource> {
        self.program_source
    }

    /// Advance the state machine by one cycle, returns the new mode.
    pub fn update(&mut self, input: &ModeInput) -> Mode {
        let previous = self.mode;
        match self.mode {
            Mode::Normal => {
                if input.program_pressed && input.macro_record_pressed {
                    self.mode = Mode::Waiting(Pending::MacroRecordTrigger);
                } else if input.program_pressed {
                    self.mode = Mode::Waiting(Pending::ProgrammingSource);
                }
            }
            Mode::Waiting(next) => {
                if input.pressed_count == 0 {
                    self.enter(next.into());
                }
            }
            Mode::ProgrammingSource => {
                if input.pressed_count == 1 {
                    if let Some((pos, action)) = input.first_pressed {
                        info!("Program source: {:?} {:?}", pos, action);
                        self.program_source = Some(ProgramSource { pos, action });
                    }
                    self.mode = Mode::Waiting(Pending::ProgrammingDestination);
                } else if input.pressed_count >= 2 && input.program_pressed {
                    self.leave_programming();
                }
            }
            Mode::ProgrammingDestination => {
                if input.pressed_count == 1 {
                    // Remapping is not persisted, the pair is only reported
                    if let (Some(source), Some((pos, action))) = (self.program_source, input.first_pressed) {
                        info!("Program destination: {:?} {:?} for source {:?}", pos, action, source.pos);
                    }
                    self.program_source = None;
                    self.mode = Mode::Waiting(Pending::ProgrammingSource);
                } else if input.pressed_count >= 2 && input.program_pressed {
                    self.leave_programming();
                }
            }
            Mode::MacroRecordTrigger => {
                if input.pressed_count > 0 {
                    self.mode = Mode::Waiting(Pending::MacroRecord);
                }
            }
            Mode::MacroRecord => {
                if input.program_pressed && input.macro_record_pressed {
                    self.recording = false;
                    info!("Macro recording stopped");
                    self.mode = Mode::Waiting(Pending::Normal);
                }
            }
            Mode::MacroPlay => {}
            Mode::LayerSwitch => {
                warn!("Mode {:?} has no handler, back to normal mode", self.mode);
                self.mode = Mode::Normal;
            }
        }

        if self.mode != previous {
            info!("Mode: {:?} -> {:?}", previous, self.mode);
        }
        self.mode
    }

    fn leave_programming(&mut self) {
        self.program_source = None;
        self.mode = Mode::Waiting(Pending::Normal);
    }

    /// Commit the mode a `Waiting` state was holding
    fn enter(&mut self, mode: Mode) {
        if mode == Mode::MacroRecord {
            self.recording = true;
            info!("Macro recording started");
        }
        self.mode = mode;
    }

    /// Force a mode, bypassing the transitions
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }
}
