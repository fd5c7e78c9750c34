//! Traits and types for sending keyboard reports to the host.
use usbd_hid::descriptor::KeyboardReport;

use crate::report::Report;
use crate::types::keycode::HidKeyCode;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidError {
    /// The report sink failed, the report will be sent again next cycle
    SinkError,
}

/// Host facing keyboard, with press/release-all semantics.
///
/// Implemented by the board on top of its USB stack.
pub trait ReportSink {
    type Error;

    /// Release every key held by the host
    fn release_all(&mut self) -> Result<(), Self::Error>;

    /// Press a key, it stays held until the next `release_all`
    fn press(&mut self, keycode: HidKeyCode) -> Result<(), Self::Error>;
}

/// Sends a report only when it differs from the last one sent.
#[derive(Default)]
pub struct ReportEmitter {
    last_sent: Report,
}

impl ReportEmitter {
    pub const fn new() -> Self {
        Self { last_sent: Report::new() }
    }

    /// Send `report` if it changed, returns whether anything was sent.
    ///
    /// A changed report is sent as release-all followed by one press per keycode.
    /// If the sink fails, the report is not remembered, so the next call sends it again.
    pub fn emit<S: ReportSink>(&mut self, sink: &mut S, report: &Report) -> Result<bool, HidError> {
        if *report == self.last_sent {
            return Ok(false);
        }

        let sent = sink
            .release_all()
            .and_then(|_| report.keycodes().iter().try_for_each(|key| sink.press(*key)));
        if sent.is_err() {
            error!("Send keyboard report error: {:?}", report);
            return Err(HidError::SinkError);
        }

        debug!("Sent keyboard report: {:?}", report);
        self.last_sent = report.clone();
        Ok(true)
    }

    pub fn last_sent(&self) -> &Report {
        &self.last_sent
    }
}

impl From<&Report> for KeyboardReport {
    /// Boot protocol report: modifier keycodes go to the modifier byte, others fill the keycode slots.
    fn from(report: &Report) -> Self {
        let mut modifier = 0;
        let mut keycodes = [0u8; 6];
        let mut keys = keycodes.iter_mut();
        for key in report.keycodes() {
            if key.is_modifier() {
                modifier |= key.modifier_bit();
            } else if let Some(slot) = keys.next() {
                *slot = key.as_u8();
            }
        }
        KeyboardReport {
            modifier,
            reserved: 0,
            leds: 0,
            keycodes,
        }
    }
}
