use embassy_time::Duration;
use heapless::Vec;

/// Max number of matrix cells that can be reserved for rotary encoders
pub const MAX_ENCODER_CELLS: usize = 8;

/// The config struct for the split keyboard.
///
/// Matrix size and layer count are const generics of the keyboard types, everything tunable lives here:
/// 1. `MatrixConfig`: scanning cadence and the diode-less matrix correction.
/// 2. `DebounceConfig`: debounce window.
/// 3. `SplitConfig`: link between the two halves.
/// 4. `BehaviorConfig`: layer switching.
#[derive(Clone, Debug, Default)]
pub struct KeyboardConfig {
    pub matrix_config: MatrixConfig,
    pub debounce_config: DebounceConfig,
    pub split_config: SplitConfig,
    pub behavior_config: BehaviorConfig,
}

/// Config for matrix scanning
#[derive(Clone, Debug)]
pub struct MatrixConfig {
    /// Period of one full cycle: scan, debounce, link pull and report
    pub scan_interval: Duration,
    /// Delay between selecting a strobe line and reading the sense lines, in microseconds
    pub settle_delay_us: u32,
    /// Apply ghost correction to a diode matrix as well.
    /// The bidirectional matrix always applies it.
    pub ghost_correction: bool,
    /// `(row, col)` cells wired to rotary encoders, always read as released
    pub encoder_cells: Vec<(u8, u8), MAX_ENCODER_CELLS>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_millis(10),
            settle_delay_us: 10,
            ghost_correction: false,
            encoder_cells: Vec::new(),
        }
    }
}

/// Config for the debounce filter
#[derive(Clone, Copy, Debug)]
pub struct DebounceConfig {
    /// A raw level must be stable for longer than this before it's accepted
    pub window: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(20),
        }
    }
}

impl DebounceConfig {
    pub(crate) fn window_ms(&self) -> u32 {
        self.window.as_millis().min(u32::MAX as u64) as u32
    }
}

/// Config for the link between the two halves
#[derive(Clone, Copy, Debug)]
pub struct SplitConfig {
    /// Bus address of the secondary half
    pub peer_address: u8,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            peer_address: crate::split::DEFAULT_PEER_ADDRESS,
        }
    }
}

/// Config for layer behavior
#[derive(Clone, Copy, Debug)]
pub struct BehaviorConfig {
    /// Layer active after boot
    pub default_layer: u8,
    /// Layer the layer toggle key flips to from the default layer
    pub toggle_layer: u8,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            default_layer: 0,
            toggle_layer: 1,
        }
    }
}
