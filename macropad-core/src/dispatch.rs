//! Action dispatch with press-time resolution.
//!
//! The action resolved when an input is pressed is remembered until that
//! input is released, and the release side runs against that record rather
//! than a fresh lookup. A layer switch while a key is held therefore can
//! never leave a key registered or unregister a key that was never pressed.

use heapless::FnvIndexMap;

use crate::action::{Action, HeldKeys};
use crate::hal::{HalError, Host};
use crate::keymap::ActionMap;
use crate::layer::Layer;
use crate::types::{Edge, InputId};

/// Action currently held down by an input
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct HeldAction {
    pub action: Action,
    /// Layer the action was resolved under
    pub layer: Layer,
    /// Keys a failed script left registered
    pub stranded: HeldKeys,
}

/// Resolves edges to actions and tracks what each input holds
#[derive(Debug)]
pub struct Dispatcher {
    keymap: ActionMap,
    held: FnvIndexMap<InputId, HeldAction, 4>,
}

impl Dispatcher {
    pub fn new(keymap: ActionMap) -> Self {
        Self {
            keymap,
            held: FnvIndexMap::new(),
        }
    }

    /// Handle one committed edge
    pub fn dispatch<H: Host>(&mut self, input: InputId, edge: Edge, host: &mut H) -> Result<(), HalError> {
        match edge {
            Edge::Pressed => self.press(input, host),
            Edge::Released => self.release(input, host),
        }
    }

    fn press<H: Host>(&mut self, input: InputId, host: &mut H) -> Result<(), HalError> {
        if self.held.contains_key(&input) {
            #[cfg(feature = "defmt")]
            defmt::warn!("{} pressed while already held, ignoring", input);
            return Ok(());
        }

        let layer = host.current_highest_layer();
        let action = self.keymap.resolve(input, layer);

        #[cfg(feature = "defmt")]
        defmt::debug!("{} press on layer {}", input, layer.0);

        // Recorded before running so a failed report still gets its release.
        let record = HeldAction {
            action,
            layer,
            stranded: HeldKeys::new(),
        };
        self.held.insert(input, record).map_err(|_| HalError::InvalidConfig)?;
        let record = self.held.get_mut(&input).ok_or(HalError::InvalidConfig)?;
        action.press(host, &mut record.stranded)
    }

    fn release<H: Host>(&mut self, input: InputId, host: &mut H) -> Result<(), HalError> {
        let Some(held) = self.held.get_mut(&input) else {
            #[cfg(feature = "defmt")]
            defmt::trace!("{} released with nothing held", input);
            return Ok(());
        };

        // Kept until the release goes through, so a failed one can be retried.
        let action = held.action;
        action.release(host, &mut held.stranded)?;
        self.held.remove(&input);
        Ok(())
    }

    /// What an input currently holds, if anything
    pub fn held(&self, input: InputId) -> Option<&HeldAction> {
        self.held.get(&input)
    }

    pub fn keymap(&self) -> &ActionMap {
        &self.keymap
    }
}
