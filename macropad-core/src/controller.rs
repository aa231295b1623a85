//! Scan loop and host-facing hooks

use heapless::Vec;

use crate::debounce::MonitoredInput;
use crate::dispatch::Dispatcher;
use crate::hal::{Duration, HalError, Host, IndicatorOutput, InputSwitch};
use crate::indicator::IndicatorSet;
use crate::keymap::ActionMap;
use crate::layer::{LayerContext, LayerState};
use crate::types::{Edge, InputId, PadConfig};

/// Monitored inputs plus the dispatcher they feed
pub struct Scanner<S, const N: usize> {
    inputs: Vec<MonitoredInput<S>, N>,
    dispatcher: Dispatcher,
    window: Duration,
}

impl<S, const N: usize> Scanner<S, N>
where
    S: InputSwitch,
{
    pub fn new(keymap: ActionMap, config: &PadConfig) -> Self {
        Self {
            inputs: Vec::new(),
            dispatcher: Dispatcher::new(keymap),
            window: config.debounce_window(),
        }
    }

    /// Register a switch to be scanned every tick
    pub fn add_input(&mut self, id: InputId, switch: S) -> Result<(), &'static str> {
        if self.inputs.iter().any(|input| input.id() == id) {
            return Err("Input already monitored");
        }
        self.inputs
            .push(MonitoredInput::new(id, switch, self.window))
            .map_err(|_| "Too many monitored inputs")
    }

    /// Initialize every switch and check the keymap covers them
    pub fn init(&mut self) -> Result<(), HalError> {
        for input in self.inputs.iter_mut() {
            input.init()?;
        }

        let ids: Vec<InputId, N> = self.inputs.iter().map(|input| input.id()).collect();
        self.dispatcher.keymap().validate(&ids).map_err(|_| HalError::InvalidConfig)
    }

    /// One scan tick over all inputs, in registration order.
    ///
    /// Returns the number of edges committed. Time and layer are read from
    /// the host per input, so a script that blocks does not hand a stale
    /// timestamp to the inputs after it. A failing input does not stop the
    /// others from being scanned; the first error is returned afterwards.
    pub fn tick<H: Host>(&mut self, host: &mut H) -> Result<usize, HalError> {
        let mut handled = 0;
        let mut failure = None;

        for input in self.inputs.iter_mut() {
            let id = input.id();
            let outcome = match input.poll(host.now()) {
                Ok(Some(edge)) => {
                    handled += 1;
                    self.dispatcher.dispatch(id, edge, host)
                }
                // A release that failed earlier is retried until it goes through
                Ok(None) if !input.is_pressed() && self.dispatcher.held(id).is_some() => {
                    self.dispatcher.dispatch(id, Edge::Released, host)
                }
                Ok(None) => Ok(()),
                Err(e) => Err(e),
            };

            if let Err(e) = outcome {
                #[cfg(feature = "defmt")]
                defmt::warn!("{} failed: {}", id, e);
                failure.get_or_insert(e);
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(handled),
        }
    }

    /// Debounced state of an input
    pub fn is_pressed(&self, id: InputId) -> Option<bool> {
        self.input(id).map(|input| input.is_pressed())
    }

    pub fn input(&self, id: InputId) -> Option<&MonitoredInput<S>> {
        self.inputs.iter().find(|input| input.id() == id)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

/// Everything the host platform calls into
pub struct Macropad<S, O, const INPUTS: usize, const LEDS: usize> {
    scanner: Scanner<S, INPUTS>,
    indicators: IndicatorSet<O, LEDS>,
}

impl<S, O, const INPUTS: usize, const LEDS: usize> Macropad<S, O, INPUTS, LEDS>
where
    S: InputSwitch,
    O: IndicatorOutput,
{
    pub fn new(scanner: Scanner<S, INPUTS>, indicators: IndicatorSet<O, LEDS>) -> Self {
        Self { scanner, indicators }
    }

    /// Post-init hook: switches, keymap check, BASE indicator
    pub fn init(&mut self) -> Result<(), HalError> {
        self.scanner.init()?;
        self.indicators.init()?;

        #[cfg(feature = "defmt")]
        defmt::info!("macropad initialized");
        Ok(())
    }

    /// Layer-change hook: sync indicators, hand the state back unchanged.
    ///
    /// Indicator failures are cosmetic and only logged.
    pub fn layer_state_set(&mut self, state: LayerState) -> LayerState {
        if let Err(_e) = self.indicators.sync(state.current_highest_layer()) {
            #[cfg(feature = "defmt")]
            defmt::warn!("indicator sync failed: {}", _e);
        }
        state
    }

    /// Scan-tick hook
    pub fn scan_tick<H: Host>(&mut self, host: &mut H) -> Result<usize, HalError> {
        self.scanner.tick(host)
    }

    pub fn scanner(&self) -> &Scanner<S, INPUTS> {
        &self.scanner
    }

    pub fn scanner_mut(&mut self) -> &mut Scanner<S, INPUTS> {
        &mut self.scanner
    }

    pub fn indicators(&self) -> &IndicatorSet<O, LEDS> {
        &self.indicators
    }

    /// Split into the parts a board runs from separate tasks
    pub fn into_parts(self) -> (Scanner<S, INPUTS>, IndicatorSet<O, LEDS>) {
        (self.scanner, self.indicators)
    }
}
