//! Render layers
//!
//! Renderables are grouped into layers that fix the coarse draw order:
//! the three world layers draw first (through cameras), the UI layer
//! always draws last, in screen space.

/// A named render layer. Variants are listed in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Midground,
    Foreground,
    /// Screen-space layer, composited after all world layers.
    Ui,
}

impl Layer {
    /// World-space layers, in draw order. Cameras apply only to these.
    pub const WORLD: [Layer; 3] = [Layer::Background, Layer::Midground, Layer::Foreground];

    /// All layers, in draw order.
    pub const ALL: [Layer; 4] = [
        Layer::Background,
        Layer::Midground,
        Layer::Foreground,
        Layer::Ui,
    ];

    /// Position of this layer in the overall draw order.
    pub fn order(self) -> u8 {
        match self {
            Layer::Background => 0,
            Layer::Midground => 1,
            Layer::Foreground => 2,
            Layer::Ui => 3,
        }
    }

    /// Whether this layer is drawn through cameras.
    pub fn is_world(self) -> bool {
        !matches!(self, Layer::Ui)
    }
}

/// A set of layers excluded from a camera.
///
/// Empty by default: the camera draws every world layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerMask(u8);

impl LayerMask {
    /// Mask that excludes nothing.
    pub const NONE: LayerMask = LayerMask(0);

    /// Return a mask that additionally excludes `layer`.
    pub fn exclude(self, layer: Layer) -> Self {
        LayerMask(self.0 | 1 << layer.order())
    }

    /// Whether `layer` is excluded by this mask.
    pub fn excludes(self, layer: Layer) -> bool {
        self.0 & (1 << layer.order()) != 0
    }

    /// Whether `layer` passes this mask.
    pub fn allows(self, layer: Layer) -> bool {
        !self.excludes(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_order() {
        assert!(Layer::Background.order() < Layer::Midground.order());
        assert!(Layer::Midground.order() < Layer::Foreground.order());
        assert!(Layer::Foreground.order() < Layer::Ui.order());
    }

    #[test]
    fn test_world_layers_exclude_ui() {
        assert!(!Layer::WORLD.contains(&Layer::Ui));
        assert!(Layer::WORLD.iter().all(|l| l.is_world()));
        assert!(!Layer::Ui.is_world());
    }

    #[test]
    fn test_mask_excludes() {
        let mask = LayerMask::NONE.exclude(Layer::Background);
        assert!(mask.excludes(Layer::Background));
        assert!(mask.allows(Layer::Midground));
        assert!(mask.allows(Layer::Ui));
    }

    #[test]
    fn test_empty_mask_allows_all() {
        for layer in Layer::ALL {
            assert!(LayerMask::NONE.allows(layer));
        }
    }
}
