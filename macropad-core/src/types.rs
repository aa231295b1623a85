//! Core data types for the macropad

use crate::hal::Duration;

/// Directly-wired inputs monitored outside the key matrix
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputId {
    /// Large analog-style spacebar switch
    Spacebar,
    /// Push switch of the first rotary encoder
    Encoder1Switch,
    /// Push switch of the second rotary encoder
    Encoder2Switch,
}

impl InputId {
    /// All inputs in scan order
    pub const ALL: [InputId; 3] = [InputId::Spacebar, InputId::Encoder1Switch, InputId::Encoder2Switch];

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            InputId::Spacebar => "spacebar",
            InputId::Encoder1Switch => "encoder-1-switch",
            InputId::Encoder2Switch => "encoder-2-switch",
        }
    }
}

/// Committed transition of a debounced input
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Released -> pressed
    Pressed,
    /// Pressed -> released
    Released,
}

impl Edge {
    /// Logical state after the transition
    pub const fn is_press(&self) -> bool {
        match self {
            Edge::Pressed => true,
            Edge::Released => false,
        }
    }

    pub const fn from_state(pressed: bool) -> Edge {
        if pressed {
            Edge::Pressed
        } else {
            Edge::Released
        }
    }
}

/// Macropad configuration parameters
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PadConfig {
    /// Continuous divergence required before committing a transition
    pub debounce_ms: u64,
    /// Period of the scan tick
    pub scan_interval_ms: u64,
    /// Indicators are lit by driving the pin high
    pub indicators_active_high: bool,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 5,
            scan_interval_ms: 1,
            indicators_active_high: true,
        }
    }
}

impl PadConfig {
    /// Create a new configuration with validation
    pub fn new(
        debounce_ms: u64,
        scan_interval_ms: u64,
        indicators_active_high: bool,
    ) -> Result<Self, &'static str> {
        if debounce_ms > 100 {
            return Err("Debounce must be <= 100ms");
        }
        if scan_interval_ms == 0 {
            return Err("Scan interval must be at least 1ms");
        }
        if debounce_ms > 0 && scan_interval_ms > debounce_ms {
            return Err("Scan interval must not exceed the debounce window");
        }

        Ok(Self {
            debounce_ms,
            scan_interval_ms,
            indicators_active_high,
        })
    }

    /// Debounce window as a duration
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Scan tick period as a duration
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }
}
