//! # splitcore
//!
//! Firmware core of a two-half split keyboard.
//!
//! Each cycle the primary half scans its matrix, debounces it, pulls the secondary half's debounced
//! key states over the split link, merges both into one keyboard report and runs the mode state machine.
//! The secondary half only scans, debounces and publishes its key states for the primary to pull.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
// Enable std for test
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod debounce;
pub mod driver;
pub mod hid;
pub mod keyboard;
pub mod keymap;
pub mod layout_macro;
pub mod matrix;
pub mod mode;
pub mod report;
pub mod split;

pub use heapless;
pub use splitcore_types as types;

pub use keyboard::{Keyboard, KeyboardContext, Side};

/// Number of keycode slots in a keyboard report
pub const REPORT_SLOTS: usize = 6;
