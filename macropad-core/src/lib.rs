#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Macropad Core
//!
//! Input-handling core for a macropad's directly-wired switches: debounced
//! edge detection for the spacebar and encoder push switches, per-layer
//! action dispatch that always releases what it pressed, and layer
//! indicator synchronisation. Matrix scanning, USB transport, encoder
//! rotation and the layer stack itself belong to the host platform.

pub mod types;
pub mod hal;
pub mod keycode;
pub mod layer;
pub mod action;
pub mod keymap;
pub mod debounce;
pub mod dispatch;
pub mod indicator;
pub mod report;
pub mod controller;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use hal::{*, Instant, Duration};
pub use keycode::Keycode;
pub use layer::*;
pub use action::*;
pub use keymap::*;
pub use debounce::*;
pub use dispatch::*;
pub use indicator::*;
pub use report::KeyboardReport;
pub use controller::*;

/// Macropad core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration: 5ms debounce, 1ms scan, active-high indicators
pub fn default_config() -> PadConfig {
    PadConfig {
        debounce_ms: 5,
        scan_interval_ms: 1,
        indicators_active_high: true,
    }
}
