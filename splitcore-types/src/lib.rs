//! # splitcore types
//!
//! Type definitions shared by the `splitcore` firmware and board crates.
//!
//! - [`keycode`] - HID keyboard usages that can be reported to the host
//! - [`action`] - Keymap entries: no-op, keycode or firmware command

#![no_std]

pub mod action;
pub mod keycode;
