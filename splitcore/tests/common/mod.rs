#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use splitcore::driver::flex_pin::FlexPin;
use splitcore::hid::ReportSink;
use splitcore::matrix::{KeyGrid, MatrixTrait};
use splitcore::split::driver::{SplitDriverError, SplitTransport};
use splitcore::split::peripheral::SharedKeyState;
use splitcore::types::action::KeyAction;
use splitcore::types::keycode::HidKeyCode;
use splitcore::{a, cmd, k, layer};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub const ROW: usize = 4;
pub const COL: usize = 6;
pub const NUM_LAYER: usize = 3;

/// 4x6 per half, default / function / numpad layers
#[rustfmt::skip]
pub const fn get_keymap() -> [[[[KeyAction; COL]; ROW]; 2]; NUM_LAYER] {
    [
        [
            layer!([
                [k!(Q), k!(W), k!(E), k!(R), k!(T), k!(Y)],
                [k!(A), k!(S), k!(D), k!(F), k!(G), k!(H)],
                [k!(Z), k!(X), k!(C), k!(V), k!(B), k!(N)],
                [k!(Escape), k!(Tab), k!(LCtrl), k!(LShift), k!(Backspace), k!(LAlt)]
            ]),
            layer!([
                [k!(Y), k!(U), k!(I), k!(O), k!(P), k!(Backslash)],
                [k!(J), k!(K), k!(L), k!(Semicolon), k!(Quote), k!(Enter)],
                [k!(M), k!(Comma), k!(Dot), k!(Slash), k!(RShift), k!(RAlt)],
                [cmd!(LayerToggle), k!(Space), k!(Left), k!(Down), k!(Up), k!(Right)]
            ]),
        ],
        [
            layer!([
                [k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5), k!(Kc6)],
                [k!(F1), k!(F2), k!(F3), k!(F4), k!(F5), k!(F6)],
                [k!(F7), k!(F8), k!(F9), k!(F10), k!(F11), k!(F12)],
                [k!(Escape), k!(Tab), k!(LCtrl), k!(LShift), k!(Backspace), k!(LAlt)]
            ]),
            layer!([
                [k!(Kc7), k!(Kc8), k!(Kc9), k!(Kc0), k!(Minus), k!(Equal)],
                [k!(Home), k!(PageDown), k!(PageUp), k!(End), k!(Delete), k!(Enter)],
                [cmd!(MacroRecord), k!(KbVolumeDown), k!(KbVolumeUp), k!(KbMute), k!(PrintScreen), cmd!(ProgramMode)],
                [cmd!(LayerToggle), k!(Space), k!(Left), k!(Down), k!(Up), k!(Right)]
            ]),
        ],
        [
            layer!([
                [a!(No), a!(No), a!(No), a!(No), a!(No), a!(No)],
                [a!(No), a!(No), a!(No), a!(No), a!(No), a!(No)],
                [a!(No), a!(No), a!(No), a!(No), a!(No), a!(No)],
                [k!(Escape), k!(Tab), k!(LCtrl), k!(LShift), k!(Backspace), k!(LAlt)]
            ]),
            layer!([
                [k!(NumLock), k!(KpSlash), k!(KpAsterisk), k!(KpMinus), a!(No), a!(No)],
                [k!(Kp7), k!(Kp8), k!(Kp9), k!(KpPlus), a!(No), a!(No)],
                [k!(Kp4), k!(Kp5), k!(Kp6), a!(No), a!(No), a!(No)],
                [k!(Kp1), k!(Kp2), k!(Kp3), k!(KpEnter), k!(Kp0), k!(KpDot)]
            ]),
        ],
    ]
}

/// Electrical line of a simulated matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    Row(usize),
    Col(usize),
}

/// Simulated switch matrix.
///
/// Pressed switches connect lines. A line reads low when a line driven low reaches it through pressed switches.
/// A switch with a diode only passes from `from` to `to`.
#[derive(Default)]
pub struct Board {
    switches: Vec<(Line, Line, bool)>,
    driven_low: HashSet<Line>,
}

pub type SharedBoard = Rc<RefCell<Board>>;

impl Board {
    pub fn shared() -> SharedBoard {
        Rc::new(RefCell::new(Board::default()))
    }

    /// Switch with a row-to-column diode
    pub fn press(&mut self, row: usize, col: usize) {
        self.switches.push((Line::Row(row), Line::Col(col), true));
    }

    /// Switch without a diode
    pub fn press_no_diode(&mut self, row: usize, col: usize) {
        self.switches.push((Line::Row(row), Line::Col(col), false));
    }

    /// Switch of a duplex matrix at logical column `col`
    pub fn press_duplex(&mut self, row: usize, col: usize) {
        if col % 2 == 1 {
            self.switches.push((Line::Row(row), Line::Col(col / 2), true));
        } else {
            self.switches.push((Line::Col(col / 2), Line::Row(row), true));
        }
    }

    pub fn release_all(&mut self) {
        self.switches.clear();
    }

    pub fn driven_lines(&self) -> usize {
        self.driven_low.len()
    }

    fn drive_low(&mut self, line: Line, low: bool) {
        if low {
            self.driven_low.insert(line);
        } else {
            self.driven_low.remove(&line);
        }
    }

    fn reads_low(&self, line: Line) -> bool {
        let mut reached: HashSet<Line> = self.driven_low.clone();
        let mut frontier: Vec<Line> = reached.iter().copied().collect();
        while let Some(current) = frontier.pop() {
            for &(from, to, diode) in &self.switches {
                let next = if from == current {
                    Some(to)
                } else if to == current && !diode {
                    Some(from)
                } else {
                    None
                };
                if let Some(next) = next {
                    if reached.insert(next) {
                        frontier.push(next);
                    }
                }
            }
        }
        reached.contains(&line)
    }
}

pub struct SimOutputPin {
    board: SharedBoard,
    line: Line,
}

pub struct SimInputPin {
    board: SharedBoard,
    line: Line,
}

impl ErrorType for SimOutputPin {
    type Error = Infallible;
}

impl OutputPin for SimOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.board.borrow_mut().drive_low(self.line, true);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.board.borrow_mut().drive_low(self.line, false);
        Ok(())
    }
}

impl ErrorType for SimInputPin {
    type Error = Infallible;
}

impl InputPin for SimInputPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.board.borrow().reads_low(self.line))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.board.borrow().reads_low(self.line))
    }
}

/// Row output pins and column input pins of a simulated diode matrix
pub fn sim_pins<const R: usize, const C: usize>(board: &SharedBoard) -> ([SimInputPin; C], [SimOutputPin; R]) {
    let inputs = core::array::from_fn(|col| SimInputPin {
        board: board.clone(),
        line: Line::Col(col),
    });
    let outputs = core::array::from_fn(|row| SimOutputPin {
        board: board.clone(),
        line: Line::Row(row),
    });
    (inputs, outputs)
}

pub struct SimFlexPin {
    board: SharedBoard,
    line: Line,
    output: bool,
    low: bool,
}

impl SimFlexPin {
    pub fn new(board: &SharedBoard, line: Line) -> Self {
        Self {
            board: board.clone(),
            line,
            output: false,
            low: false,
        }
    }

    fn apply(&mut self) {
        let driven = self.output && self.low;
        self.board.borrow_mut().drive_low(self.line, driven);
    }
}

impl ErrorType for SimFlexPin {
    type Error = Infallible;
}

impl OutputPin for SimFlexPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.low = true;
        self.apply();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.low = false;
        self.apply();
        Ok(())
    }
}

impl InputPin for SimFlexPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.board.borrow().reads_low(self.line))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.board.borrow().reads_low(self.line))
    }
}

impl FlexPin for SimFlexPin {
    fn set_as_input(&mut self) {
        self.output = false;
        self.apply();
    }

    fn set_as_output(&mut self) {
        self.output = true;
        self.apply();
    }
}

/// Matrix returning whatever the test puts into it
#[derive(Clone, Default)]
pub struct FakeMatrix {
    pub grid: Rc<RefCell<KeyGrid<ROW, COL>>>,
}

impl FakeMatrix {
    pub fn press(&self, row: usize, col: usize) {
        self.grid.borrow_mut().set(row, col, true);
    }

    pub fn release(&self, row: usize, col: usize) {
        self.grid.borrow_mut().set(row, col, false);
    }

    pub fn release_all(&self) {
        self.grid.borrow_mut().clear();
    }
}

impl MatrixTrait<ROW, COL> for FakeMatrix {
    fn scan(&mut self) -> KeyGrid<ROW, COL> {
        *self.grid.borrow()
    }
}

/// Transport answering from the secondary's published key states
pub struct LoopbackTransport<'a> {
    pub peer: &'a SharedKeyState,
    pub address: u8,
    pub fail: Rc<Cell<bool>>,
    /// Truncate answers to this many bytes
    pub max_len: Rc<Cell<Option<usize>>>,
}

impl<'a> LoopbackTransport<'a> {
    pub fn new(peer: &'a SharedKeyState, address: u8) -> Self {
        Self {
            peer,
            address,
            fail: Rc::new(Cell::new(false)),
            max_len: Rc::new(Cell::new(None)),
        }
    }
}

impl SplitTransport for LoopbackTransport<'_> {
    fn request(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, SplitDriverError> {
        if self.fail.get() || address != self.address {
            return Err(SplitDriverError::BusError);
        }
        let len = self.max_len.get().map_or(buf.len(), |max| max.min(buf.len()));
        Ok(self.peer.respond(&mut buf[..len]))
    }
}

/// Sink tracking what the host sees
#[derive(Default)]
pub struct HostSink {
    pub held: Vec<HidKeyCode>,
    /// Number of reports sent
    pub reports: usize,
}

impl ReportSink for HostSink {
    type Error = Infallible;

    fn release_all(&mut self) -> Result<(), Infallible> {
        self.held.clear();
        self.reports += 1;
        Ok(())
    }

    fn press(&mut self, keycode: HidKeyCode) -> Result<(), Infallible> {
        self.held.push(keycode);
        Ok(())
    }
}
