use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Pin that can be switched between input and output.
///
/// Used by matrices that strobe in both directions. As an input the pin must be pulled up,
/// so an idle line reads high and a line connected to a strobed (low) line reads low.
pub trait FlexPin: ErrorType + InputPin + OutputPin {
    /// Switch to input with pull-up
    fn set_as_input(&mut self);

    /// Switch to push-pull output
    fn set_as_output(&mut self);
}
