//! ATmega32U4 board wiring
//!
//! Direct GPIO only: the key matrix belongs to the platform scanner.
//!
//! | Signal            | Pin | Wiring                        |
//! |-------------------|-----|-------------------------------|
//! | Spacebar          | PF7 | active high, external pull-down |
//! | Encoder 1 switch  | PD6 | active low, internal pull-up  |
//! | Encoder 2 switch  | PF0 | active low, internal pull-up  |
//! | LED layer 0..3    | PF1, PF4, PF5, PF6 | active high  |

use avr_device::atmega32u4::{PORTD, PORTF};
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use macropad_core::{
    EmbeddedHalIndicator, EmbeddedHalSwitch, IndicatorSet, InputId, PadConfig, Polarity, Pull, Scanner,
};

/// GPIO ports used by the board
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Port {
    D,
    F,
}

/// A single port bit
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct GpioPin {
    port: Port,
    mask: u8,
}

pub const SPACEBAR_PIN: GpioPin = GpioPin::new(Port::F, 7);
pub const ENC_SW_1_PIN: GpioPin = GpioPin::new(Port::D, 6);
pub const ENC_SW_2_PIN: GpioPin = GpioPin::new(Port::F, 0);
pub const LED_PINS: [GpioPin; 4] = [
    GpioPin::new(Port::F, 1),
    GpioPin::new(Port::F, 4),
    GpioPin::new(Port::F, 5),
    GpioPin::new(Port::F, 6),
];

impl GpioPin {
    pub const fn new(port: Port, bit: u8) -> Self {
        Self { port, mask: 1 << bit }
    }

    /// Configure as input with the given pull
    pub fn into_input(self, pull: Pull) -> Self {
        self.modify_ddr(false);
        // On this part the pull-up is the PORT bit of an input pin.
        self.modify_port(matches!(pull, Pull::Up));
        self
    }

    /// Configure as push-pull output, driven low
    pub fn into_output(self) -> Self {
        self.modify_port(false);
        self.modify_ddr(true);
        self
    }

    fn read_pin(&self) -> u8 {
        // SAFETY: PIN registers are read-only snapshots of the port.
        unsafe {
            match self.port {
                Port::D => (*PORTD::ptr()).pind.read().bits(),
                Port::F => (*PORTF::ptr()).pinf.read().bits(),
            }
        }
    }

    fn modify_port(&self, set: bool) {
        let mask = self.mask;
        // SAFETY: single-core, and every board pin owns a distinct bit.
        unsafe {
            match self.port {
                Port::D => (*PORTD::ptr())
                    .portd
                    .modify(|r, w| w.bits(if set { r.bits() | mask } else { r.bits() & !mask })),
                Port::F => (*PORTF::ptr())
                    .portf
                    .modify(|r, w| w.bits(if set { r.bits() | mask } else { r.bits() & !mask })),
            }
        }
    }

    fn modify_ddr(&self, output: bool) {
        let mask = self.mask;
        // SAFETY: see modify_port.
        unsafe {
            match self.port {
                Port::D => (*PORTD::ptr())
                    .ddrd
                    .modify(|r, w| w.bits(if output { r.bits() | mask } else { r.bits() & !mask })),
                Port::F => (*PORTF::ptr())
                    .ddrf
                    .modify(|r, w| w.bits(if output { r.bits() | mask } else { r.bits() & !mask })),
            }
        }
    }
}

impl ErrorType for GpioPin {
    type Error = Infallible;
}

impl InputPin for GpioPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read_pin() & self.mask != 0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read_pin() & self.mask == 0)
    }
}

impl OutputPin for GpioPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.modify_port(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.modify_port(true);
        Ok(())
    }
}

pub type BoardSwitch = EmbeddedHalSwitch<GpioPin>;
pub type BoardIndicator = EmbeddedHalIndicator<GpioPin>;
pub type BoardScanner = Scanner<BoardSwitch, 3>;
pub type BoardIndicators = IndicatorSet<BoardIndicator, 4>;

fn switch(pin: GpioPin, polarity: Polarity) -> BoardSwitch {
    EmbeddedHalSwitch::new(pin.into_input(polarity.pull()), polarity)
}

/// Configure pins and build the scanner for the three direct switches
pub fn init_scanner(config: &PadConfig) -> Result<BoardScanner, &'static str> {
    let mut scanner = Scanner::new(macropad_core::default_keymap()?, config);
    scanner.add_input(InputId::Spacebar, switch(SPACEBAR_PIN, Polarity::ActiveHigh))?;
    scanner.add_input(InputId::Encoder1Switch, switch(ENC_SW_1_PIN, Polarity::ActiveLow))?;
    scanner.add_input(InputId::Encoder2Switch, switch(ENC_SW_2_PIN, Polarity::ActiveLow))?;
    Ok(scanner)
}

/// Configure LED pins as outputs
pub fn init_indicators(config: &PadConfig) -> BoardIndicators {
    let inverted = !config.indicators_active_high;
    IndicatorSet::new(LED_PINS.map(|pin| EmbeddedHalIndicator::new(pin.into_output(), inverted)))
}
