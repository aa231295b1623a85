//! Layer indicator synchronisation

use crate::hal::{HalError, IndicatorOutput};
use crate::layer::Layer;

/// One indicator per layer, index = layer
pub struct IndicatorSet<O, const N: usize> {
    outputs: [O; N],
}

impl<O, const N: usize> IndicatorSet<O, N>
where
    O: IndicatorOutput,
{
    pub fn new(outputs: [O; N]) -> Self {
        Self { outputs }
    }

    /// Light the BASE indicator only
    pub fn init(&mut self) -> Result<(), HalError> {
        self.sync(Layer::BASE)
    }

    /// Turn everything off, then light the indicator for `layer`.
    ///
    /// A layer without an indicator leaves all of them off.
    pub fn sync(&mut self, layer: Layer) -> Result<(), HalError> {
        for output in self.outputs.iter_mut() {
            output.set_active(false)?;
        }

        match self.outputs.get_mut(layer.index()) {
            Some(output) => output.set_active(true)?,
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("no indicator for layer {}", layer.0);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("indicator -> layer {}", layer.0);
        Ok(())
    }

    /// Layer whose indicator is lit, if exactly one is
    pub fn active(&self) -> Option<Layer> {
        let mut lit = self.outputs.iter().enumerate().filter(|(_, o)| o.is_active());
        match (lit.next(), lit.next()) {
            (Some((index, _)), None) => Some(Layer(index as u8)),
            _ => None,
        }
    }

    /// Commanded state of each indicator
    pub fn states(&self) -> [bool; N] {
        core::array::from_fn(|i| self.outputs[i].is_active())
    }

    pub fn outputs(&self) -> &[O; N] {
        &self.outputs
    }
}
