//! Host-platform services for the core: layer stack, key events, time

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use portable_atomic::{AtomicU32, Ordering};

use macropad_core::{
    Clock, EmbassyClock, HalError, InputId, Instant, KeyReporter, Keycode, Layer, LayerContext, LayerState,
    MAX_SCRIPT_HELD, MAX_SCRIPT_REPORTS,
};

/// Register/unregister request for the HID report builder
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub key: Keycode,
    pub pressed: bool,
}

/// Authoritative layer stack, written by the layer-change hook
pub static LAYER_STATE: AtomicU32 = AtomicU32::new(1);

/// Raised on every layer stack change
pub static LAYER_CHANGED: Signal<CriticalSectionRawMutex, LayerState> = Signal::new();

/// Room for the longest script plus every other input in the same tick.
///
/// Scripts block the executor, so nothing drains the queue until the scan
/// tick that ran them has returned.
pub const KEY_EVENT_CAPACITY: usize = MAX_SCRIPT_REPORTS + MAX_SCRIPT_HELD + 2 * InputId::ALL.len();

const _: () = assert!(KEY_EVENT_CAPACITY >= MAX_SCRIPT_REPORTS);

/// Key events towards the HID report builder
pub static KEY_EVENTS: Channel<CriticalSectionRawMutex, KeyEvent, KEY_EVENT_CAPACITY> = Channel::new();

/// Layer-change hook for the platform layer stack
pub fn layer_state_set(state: LayerState) -> LayerState {
    LAYER_STATE.store(state.0, Ordering::Release);
    LAYER_CHANGED.signal(state);
    state
}

/// Host services as seen from the scan task
#[derive(Default)]
pub struct BoardHost {
    clock: EmbassyClock,
}

impl BoardHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn send(&mut self, key: Keycode, pressed: bool) -> Result<(), HalError> {
        KEY_EVENTS
            .try_send(KeyEvent { key, pressed })
            .map_err(|_| HalError::ReportError)
    }
}

impl KeyReporter for BoardHost {
    fn register(&mut self, key: Keycode) -> Result<(), HalError> {
        self.send(key, true)
    }

    fn unregister(&mut self, key: Keycode) -> Result<(), HalError> {
        self.send(key, false)
    }
}

impl LayerContext for BoardHost {
    fn current_highest_layer(&self) -> Layer {
        LayerState(LAYER_STATE.load(Ordering::Acquire)).highest()
    }
}

impl Clock for BoardHost {
    fn now(&self) -> Instant {
        self.clock.now()
    }
}

impl DelayNs for BoardHost {
    fn delay_ns(&mut self, ns: u32) {
        embassy_time::block_for(Duration::from_micros((ns as u64).div_ceil(1_000)));
    }

    fn delay_ms(&mut self, ms: u32) {
        embassy_time::block_for(Duration::from_millis(ms as u64));
    }
}
