//! Hardware Abstraction Layer for the macropad core

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Millisecond instant for builds without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Instant(u64);

    impl Instant {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }

        pub fn saturating_duration_since(&self, earlier: Instant) -> Duration {
            Duration::from_millis(self.0.saturating_sub(earlier.0))
        }
    }

    /// Millisecond duration for builds without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }
}

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::keycode::Keycode;
use crate::layer::LayerContext;

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// The platform refused a key report
    ReportError,
    /// Hardware not initialized
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::ReportError => write!(f, "Key report rejected by platform"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Electrical wiring of a direct switch
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Reads high when pressed (external pull-down)
    ActiveHigh,
    /// Reads low when pressed (internal pull-up)
    ActiveLow,
}

/// Pull resistor a board has to configure for a switch
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
}

impl Polarity {
    /// Pull configuration expected by this wiring.
    ///
    /// Active-high switches rely on an external pull-down, so the pin is
    /// left floating on the MCU side.
    pub const fn pull(&self) -> Pull {
        match self {
            Polarity::ActiveHigh => Pull::None,
            Polarity::ActiveLow => Pull::Up,
        }
    }

    /// Map an electrical level to the logical "pressed" state
    pub const fn is_active(&self, level_high: bool) -> bool {
        match self {
            Polarity::ActiveHigh => level_high,
            Polarity::ActiveLow => !level_high,
        }
    }
}

/// Trait for direct-wired switch inputs
pub trait InputSwitch {
    /// Prepare the input for sampling
    fn init(&mut self) -> Result<(), HalError> {
        Ok(())
    }

    /// Polarity-normalized state: true means pressed
    fn is_active(&mut self) -> Result<bool, HalError>;

    /// Wiring of this switch
    fn polarity(&self) -> Polarity;
}

/// Trait for layer indicator outputs
pub trait IndicatorOutput {
    /// Drive the indicator (true = lit)
    fn set_active(&mut self, active: bool) -> Result<(), HalError>;

    /// Last commanded state
    fn is_active(&self) -> bool;
}

/// Key event sink provided by the platform HID stack
pub trait KeyReporter {
    /// Press a key and keep it held in the report
    fn register(&mut self, key: Keycode) -> Result<(), HalError>;

    /// Remove a key from the report
    fn unregister(&mut self, key: Keycode) -> Result<(), HalError>;

    /// Type literal ASCII text as a series of taps.
    ///
    /// Characters without a keycode are skipped.
    fn type_text(&mut self, text: &str) -> Result<(), HalError> {
        for ch in text.chars() {
            let Some((key, shifted)) = Keycode::from_ascii(ch) else {
                #[cfg(feature = "defmt")]
                defmt::warn!("no keycode for character {}", ch);
                continue;
            };
            if shifted {
                self.register(Keycode::LShift)?;
            }
            self.register(key)?;
            self.unregister(key)?;
            if shifted {
                self.unregister(Keycode::LShift)?;
            }
        }
        Ok(())
    }
}

/// Monotonic time source
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Everything the scan tick needs from the host platform
pub trait Host: KeyReporter + LayerContext + Clock + DelayNs {}

impl<T> Host for T where T: KeyReporter + LayerContext + Clock + DelayNs {}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy-time")]
#[derive(Copy, Clone, Debug, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Generic implementation for embedded-hal compatible input pins
pub struct EmbeddedHalSwitch<P> {
    pin: P,
    polarity: Polarity,
}

impl<P> EmbeddedHalSwitch<P>
where
    P: InputPin,
{
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }
}

impl<P> InputSwitch for EmbeddedHalSwitch<P>
where
    P: InputPin,
{
    fn is_active(&mut self) -> Result<bool, HalError> {
        let high = self.pin.is_high().map_err(|_| HalError::GpioError)?;
        Ok(self.polarity.is_active(high))
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }
}

/// Generic implementation for embedded-hal compatible output pins
pub struct EmbeddedHalIndicator<P> {
    pin: P,
    inverted: bool,
    active: bool,
}

impl<P> EmbeddedHalIndicator<P>
where
    P: OutputPin,
{
    pub fn new(pin: P, inverted: bool) -> Self {
        Self {
            pin,
            inverted,
            active: false,
        }
    }
}

impl<P> IndicatorOutput for EmbeddedHalIndicator<P>
where
    P: OutputPin,
{
    fn set_active(&mut self, active: bool) -> Result<(), HalError> {
        let level_high = if self.inverted { !active } else { active };
        if level_high {
            self.pin.set_high().map_err(|_| HalError::GpioError)?;
        } else {
            self.pin.set_low().map_err(|_| HalError::GpioError)?;
        }
        self.active = active;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use crate::layer::{Layer, LayerState};
    use core::cell::Cell;
    use core::convert::Infallible;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Pin whose level is shared between clones, so a test can keep a
    /// handle while the scanner owns the other one.
    #[derive(Clone, Debug, Default)]
    pub struct MockPin {
        level: Rc<Cell<bool>>,
    }

    impl MockPin {
        pub fn new(level_high: bool) -> Self {
            Self {
                level: Rc::new(Cell::new(level_high)),
            }
        }

        pub fn set_level(&self, level_high: bool) {
            self.level.set(level_high);
        }

        pub fn level(&self) -> bool {
            self.level.get()
        }
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.level.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.level.get())
        }
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.level.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.level.set(true);
            Ok(())
        }
    }

    /// Something the host observed
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum HostEvent {
        Register(Keycode),
        Unregister(Keycode),
        Delay(u32),
    }

    /// Recording host: manual clock, settable layer stack
    #[derive(Debug, Default)]
    pub struct MockHost {
        now_ms: u64,
        layers: LayerState,
        events: Vec<HostEvent>,
        report_budget: Option<usize>,
    }

    impl MockHost {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_time(&mut self, ms: u64) {
            self.now_ms = ms;
        }

        pub fn advance(&mut self, ms: u64) {
            self.now_ms += ms;
        }

        pub fn set_layer_state(&mut self, state: LayerState) {
            self.layers = state;
        }

        /// Make the layer the only active one
        pub fn set_layer(&mut self, layer: Layer) {
            self.layers = LayerState::only(layer);
        }

        /// Make every register/unregister fail
        pub fn reject_reports(&mut self, reject: bool) {
            self.report_budget = if reject { Some(0) } else { None };
        }

        /// Accept `count` more reports, then fail the rest
        pub fn limit_reports(&mut self, count: usize) {
            self.report_budget = Some(count);
        }

        fn report(&mut self, event: HostEvent) -> Result<(), HalError> {
            if let Some(left) = self.report_budget.as_mut() {
                if *left == 0 {
                    return Err(HalError::ReportError);
                }
                *left -= 1;
            }
            self.events.push(event);
            Ok(())
        }

        pub fn events(&self) -> &[HostEvent] {
            &self.events
        }

        pub fn take_events(&mut self) -> Vec<HostEvent> {
            core::mem::take(&mut self.events)
        }

        /// Keys registered and not yet unregistered
        pub fn held_keys(&self) -> Vec<Keycode> {
            let mut held = Vec::new();
            for event in &self.events {
                match event {
                    HostEvent::Register(key) => held.push(*key),
                    HostEvent::Unregister(key) => {
                        if let Some(pos) = held.iter().position(|k| k == key) {
                            held.remove(pos);
                        }
                    }
                    HostEvent::Delay(_) => {}
                }
            }
            held
        }
    }

    impl KeyReporter for MockHost {
        fn register(&mut self, key: Keycode) -> Result<(), HalError> {
            self.report(HostEvent::Register(key))
        }

        fn unregister(&mut self, key: Keycode) -> Result<(), HalError> {
            self.report(HostEvent::Unregister(key))
        }
    }

    impl LayerContext for MockHost {
        fn current_highest_layer(&self) -> Layer {
            self.layers.highest()
        }
    }

    impl Clock for MockHost {
        fn now(&self) -> Instant {
            Instant::from_millis(self.now_ms)
        }
    }

    impl DelayNs for MockHost {
        fn delay_ns(&mut self, ns: u32) {
            self.now_ms += (ns / 1_000_000) as u64;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.events.push(HostEvent::Delay(ms));
            self.now_ms += ms as u64;
        }
    }

    /// Indicator that remembers every write
    #[derive(Debug, Default)]
    pub struct MockIndicator {
        active: bool,
        writes: usize,
    }

    impl MockIndicator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn writes(&self) -> usize {
            self.writes
        }
    }

    impl IndicatorOutput for MockIndicator {
        fn set_active(&mut self, active: bool) -> Result<(), HalError> {
            self.active = active;
            self.writes += 1;
            Ok(())
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }
}
