//! Per-layer action bindings for the direct inputs

use heapless::FnvIndexMap;

use crate::action::{script_delay_ms, script_report_count, Action, Step};
use crate::keycode::Keycode;
use crate::layer::Layer;
use crate::types::InputId;

/// Capacity of the binding table (power of two)
pub const MAX_BINDINGS: usize = 16;

/// Mapping from (input, layer) to the action it triggers
#[derive(Clone, Debug, Default)]
pub struct ActionMap {
    bindings: FnvIndexMap<(InputId, Layer), Action, MAX_BINDINGS>,
}

impl ActionMap {
    /// Empty table: everything resolves to `NoAction`
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an action, replacing any previous binding
    pub fn bind(&mut self, input: InputId, layer: Layer, action: Action) -> Result<&mut Self, &'static str> {
        if !layer.is_known() {
            return Err("Layer has no bindings");
        }
        self.bindings
            .insert((input, layer), action)
            .map_err(|_| "Binding table full")?;
        Ok(self)
    }

    /// Bind the same action on every known layer
    pub fn bind_all_layers(&mut self, input: InputId, action: Action) -> Result<&mut Self, &'static str> {
        for layer in Layer::ALL {
            self.bind(input, layer, action)?;
        }
        Ok(self)
    }

    /// Action for an input on a layer; unknown pairs resolve to `NoAction`
    pub fn resolve(&self, input: InputId, layer: Layer) -> Action {
        self.bindings.get(&(input, layer)).copied().unwrap_or_default()
    }

    /// Check that every input has an explicit entry on every known layer
    pub fn validate(&self, inputs: &[InputId]) -> Result<(), &'static str> {
        for input in inputs {
            for layer in Layer::ALL {
                if !self.bindings.contains_key(&(*input, layer)) {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("missing binding for {} on layer {}", input, layer.0);
                    return Err("Keymap is missing a binding");
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// GUI+R, then type the VIA configurator address and confirm
pub const OPEN_VIA_CONFIGURATOR: &[Step] = &[
    Step::Press(Keycode::LGui),
    Step::Press(Keycode::R),
    Step::Release(Keycode::R),
    Step::Release(Keycode::LGui),
    Step::DelayMs(100),
    Step::Text("www.caniusevia.com"),
    Step::DelayMs(100),
    Step::Tap(Keycode::Enter),
];

/// Ctrl+Z
pub const UNDO: &[Step] = &[
    Step::Press(Keycode::LCtrl),
    Step::Press(Keycode::Z),
    Step::Release(Keycode::Z),
    Step::Release(Keycode::LCtrl),
];

/// Ctrl+Y
pub const REDO: &[Step] = &[
    Step::Press(Keycode::LCtrl),
    Step::Press(Keycode::Y),
    Step::Release(Keycode::Y),
    Step::Release(Keycode::LCtrl),
];

/// GUI+L
pub const LOCK_SCREEN: &[Step] = &[
    Step::Press(Keycode::LGui),
    Step::Press(Keycode::L),
    Step::Release(Keycode::L),
    Step::Release(Keycode::LGui),
];

/// Scan-loop blocking time of each shipped script
pub const OPEN_VIA_CONFIGURATOR_BLOCKING_MS: u32 = script_delay_ms(OPEN_VIA_CONFIGURATOR);
pub const UNDO_BLOCKING_MS: u32 = script_delay_ms(UNDO);
pub const REDO_BLOCKING_MS: u32 = script_delay_ms(REDO);
pub const LOCK_SCREEN_BLOCKING_MS: u32 = script_delay_ms(LOCK_SCREEN);

/// Every script bound by `default_keymap`
pub const SHIPPED_SCRIPTS: [&[Step]; 4] = [OPEN_VIA_CONFIGURATOR, UNDO, REDO, LOCK_SCREEN];

/// Most key reports a shipped script sends within one scan tick
pub const MAX_SCRIPT_REPORTS: usize = {
    let mut max = 0;
    let mut i = 0;
    while i < SHIPPED_SCRIPTS.len() {
        let count = script_report_count(SHIPPED_SCRIPTS[i]);
        if count > max {
            max = count;
        }
        i += 1;
    }
    max
};

/// Bindings shipped with the device
pub fn default_keymap() -> Result<ActionMap, &'static str> {
    let mut map = ActionMap::new();
    map.bind_all_layers(InputId::Spacebar, Action::SimpleKey(Keycode::Space))?
        .bind(InputId::Encoder1Switch, Layer::BASE, Action::Script(OPEN_VIA_CONFIGURATOR))?
        .bind(InputId::Encoder1Switch, Layer::LAYER_1, Action::Script(UNDO))?
        .bind(InputId::Encoder1Switch, Layer::LAYER_2, Action::Script(REDO))?
        .bind(InputId::Encoder1Switch, Layer::LAYER_3, Action::Script(LOCK_SCREEN))?
        .bind_all_layers(InputId::Encoder2Switch, Action::NoAction)?;
    map.validate(&InputId::ALL)?;
    Ok(map)
}
