//! Layer identifiers and the host layer stack

/// Logical layer, ordered by precedence (higher index wins)
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layer(pub u8);

impl Layer {
    pub const BASE: Layer = Layer(0);
    pub const LAYER_1: Layer = Layer(1);
    pub const LAYER_2: Layer = Layer(2);
    pub const LAYER_3: Layer = Layer(3);

    /// Every layer the device knows about, lowest first
    pub const ALL: [Layer; NUM_LAYERS] = [Layer::BASE, Layer::LAYER_1, Layer::LAYER_2, Layer::LAYER_3];

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// True for layers that have bindings and an indicator
    pub const fn is_known(&self) -> bool {
        self.index() < NUM_LAYERS
    }
}

/// Number of layers defined by the keymap
pub const NUM_LAYERS: usize = 4;

/// Layer stack as a bitmask, bit n set when layer n is active
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerState(pub u32);

impl LayerState {
    /// Stack with only the given layer active
    pub const fn only(layer: Layer) -> Self {
        Self(bit(layer))
    }

    pub const fn with(self, layer: Layer) -> Self {
        Self(self.0 | bit(layer))
    }

    pub const fn without(self, layer: Layer) -> Self {
        Self(self.0 & !bit(layer))
    }

    pub const fn contains(&self, layer: Layer) -> bool {
        self.0 & bit(layer) != 0
    }

    /// Highest active layer; an empty stack falls back to BASE
    pub const fn highest(&self) -> Layer {
        if self.0 == 0 {
            Layer::BASE
        } else {
            Layer((31 - self.0.leading_zeros()) as u8)
        }
    }
}

// Layers past the mask width are never active.
const fn bit(layer: Layer) -> u32 {
    match 1u32.checked_shl(layer.0 as u32) {
        Some(mask) => mask,
        None => 0,
    }
}

/// Read access to the host's authoritative layer stack.
///
/// Implementations must answer from the live state on every call.
pub trait LayerContext {
    fn current_highest_layer(&self) -> Layer;
}

impl LayerContext for LayerState {
    fn current_highest_layer(&self) -> Layer {
        self.highest()
    }
}
