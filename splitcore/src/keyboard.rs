use embassy_time::{Duration, Instant, block_for};
use embedded_hal::digital::InputPin;

use crate::config::KeyboardConfig;
use crate::debounce::DebouncerTrait;
use crate::hid::{ReportEmitter, ReportSink};
use crate::keymap::KeyMap;
use crate::matrix::{KeyGrid, MatrixTrait};
use crate::mode::{Mode, ModeInput, ModeMachine};
use crate::report::{Report, build_report};
use crate::split::central::SplitCentral;
use crate::split::driver::SplitTransport;
use crate::types::action::KeyAction;

/// Role of a half
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    /// Connected to the host, polls the other half
    Primary,
    /// Answers the primary's polls
    Secondary,
}

impl Side {
    /// Read the side select pin, which has a pull-up: high is the primary, low (strapped to ground) the secondary.
    ///
    /// A pin read error selects the primary.
    pub fn detect<P: InputPin>(pin: &mut P) -> Side {
        if pin.is_low().unwrap_or(false) {
            Side::Secondary
        } else {
            Side::Primary
        }
    }
}

/// State carried from one cycle to the next on the primary half.
pub struct KeyboardContext<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    /// Keymap and active layer
    pub keymap: KeyMap<'a, ROW, COL, NUM_LAYER>,
    /// Last key states received from the secondary half
    pub remote: KeyGrid<ROW, COL>,
    pub mode: ModeMachine,
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> KeyboardContext<'a, ROW, COL, NUM_LAYER> {
    pub fn new(keymap: KeyMap<'a, ROW, COL, NUM_LAYER>) -> Self {
        Self {
            keymap,
            remote: KeyGrid::new(),
            mode: ModeMachine::new(),
        }
    }

    /// Turn this cycle's local key states and the stored remote states into a report.
    ///
    /// The report carries keys only if the mode at the start of the cycle emits keys, otherwise it's empty.
    /// The mode state machine runs after the report is built, on the layer the report ended on.
    pub fn process(&mut self, local: &KeyGrid<ROW, COL>) -> Report {
        let layer = self.keymap.active_layer();
        let report = if self.mode.mode().emits_keys() {
            build_report(&mut self.keymap, local, &self.remote)
        } else {
            Report::new()
        };

        let input = ModeInput::collect(&self.keymap, local, &self.remote);
        let previous = self.mode.mode();
        let mode = self.mode.update(&input);

        if layer != self.keymap.active_layer() || previous != mode {
            info!("Status: mode {:?}, layer {}", mode, self.keymap.active_layer());
        }
        report
    }

    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    pub fn active_layer(&self) -> u8 {
        self.keymap.active_layer()
    }
}

/// The primary half: scans its own matrix, pulls the secondary and reports to the host.
pub struct Keyboard<'a, M, D, T, S, const ROW: usize, const COL: usize, const NUM_LAYER: usize>
where
    M: MatrixTrait<ROW, COL>,
    D: DebouncerTrait<ROW, COL>,
    T: SplitTransport,
    S: ReportSink,
{
    matrix: M,
    debouncer: D,
    central: SplitCentral<T>,
    sink: S,
    emitter: ReportEmitter,
    context: KeyboardContext<'a, ROW, COL, NUM_LAYER>,
    scan_interval: Duration,
}

impl<'a, M, D, T, S, const ROW: usize, const COL: usize, const NUM_LAYER: usize>
    Keyboard<'a, M, D, T, S, ROW, COL, NUM_LAYER>
where
    M: MatrixTrait<ROW, COL>,
    D: DebouncerTrait<ROW, COL>,
    T: SplitTransport,
    S: ReportSink,
{
    pub fn new(
        layers: &'a [[[[KeyAction; COL]; ROW]; 2]; NUM_LAYER],
        matrix: M,
        debouncer: D,
        transport: T,
        sink: S,
        config: &KeyboardConfig,
    ) -> Self {
        Self {
            matrix,
            debouncer,
            central: SplitCentral::new(transport, config.split_config.peer_address),
            sink,
            emitter: ReportEmitter::new(),
            context: KeyboardContext::new(KeyMap::new(layers, config.behavior_config)),
            scan_interval: config.matrix_config.scan_interval,
        }
    }

    /// One full cycle at `now` milliseconds: scan, debounce, pull the secondary, build and send the report.
    pub fn run_cycle(&mut self, now: u32) {
        let raw = self.matrix.scan();
        self.debouncer.update(&raw, now);

        // On failure the last received states are kept
        self.central.pull_remote(&mut self.context.remote).ok();

        let report = self.context.process(self.debouncer.state());
        // A failed report is sent again next cycle
        self.emitter.emit(&mut self.sink, &report).ok();
    }

    /// Run the keyboard, one cycle per scan interval.
    pub fn run(&mut self) -> ! {
        info!("Keyboard started");
        loop {
            let start = Instant::now();
            self.run_cycle(start.as_millis() as u32);
            let elapsed = start.elapsed();
            if elapsed < self.scan_interval {
                block_for(self.scan_interval - elapsed);
            }
        }
    }

    pub fn context(&self) -> &KeyboardContext<'a, ROW, COL, NUM_LAYER> {
        &self.context
    }

    /// Last report sent to the host
    pub fn last_report(&self) -> &Report {
        self.emitter.last_sent()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
