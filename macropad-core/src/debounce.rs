//! Debounced edge detection for direct-wired switches.
//!
//! A transition is committed only after the raw state has differed from the
//! committed state continuously for the whole window. Any sample that agrees
//! with the committed state disarms the pending timer, so a later bounce can
//! never commit against a stale start time.

use crate::hal::{Duration, Instant, InputSwitch, HalError};
use crate::types::{Edge, InputId};

/// Per-input debounce state
#[derive(Copy, Clone, Debug)]
pub struct Debouncer {
    stable: bool,
    last_raw: bool,
    pending_since: Option<Instant>,
    window: Duration,
}

impl Debouncer {
    /// Start released with no pending transition
    pub const fn new(window: Duration) -> Self {
        Self {
            stable: false,
            last_raw: false,
            pending_since: None,
            window,
        }
    }

    /// Feed one raw sample taken at `now`.
    ///
    /// Returns the committed edge, if this sample completed a window.
    pub fn update(&mut self, raw: bool, now: Instant) -> Option<Edge> {
        self.last_raw = raw;

        if raw == self.stable {
            self.pending_since = None;
            return None;
        }

        let since = *self.pending_since.get_or_insert(now);
        if now.saturating_duration_since(since) < self.window {
            return None;
        }

        self.stable = raw;
        self.pending_since = None;
        Some(Edge::from_state(raw))
    }

    /// Committed (debounced) state
    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    /// Most recent raw sample
    pub fn raw(&self) -> bool {
        self.last_raw
    }

    /// Start of the current divergence, if one is in progress
    pub fn pending_since(&self) -> Option<Instant> {
        self.pending_since
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// A monitored switch: identity, wiring and debounce state
pub struct MonitoredInput<S> {
    id: InputId,
    switch: S,
    debounce: Debouncer,
}

impl<S> MonitoredInput<S>
where
    S: InputSwitch,
{
    pub fn new(id: InputId, switch: S, window: Duration) -> Self {
        Self {
            id,
            switch,
            debounce: Debouncer::new(window),
        }
    }

    pub fn id(&self) -> InputId {
        self.id
    }

    /// Sample the switch and run the debouncer
    pub fn poll(&mut self, now: Instant) -> Result<Option<Edge>, HalError> {
        let raw = self.switch.is_active()?;
        let edge = self.debounce.update(raw, now);

        #[cfg(feature = "defmt")]
        if let Some(edge) = edge {
            defmt::debug!("{} {}", self.id, edge);
        }

        Ok(edge)
    }

    pub fn init(&mut self) -> Result<(), HalError> {
        self.switch.init()
    }

    pub fn is_pressed(&self) -> bool {
        self.debounce.is_pressed()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debounce
    }
}
