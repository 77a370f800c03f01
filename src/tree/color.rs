//! Colors and per-state visual styles carried on nodes.

/// Background color of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// Disabled scrims.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Knobs and carets.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A background color paired with an opacity.
///
/// Interactive widgets map each of their states (idle, hovered, pressed,
/// selected...) to one of these and patch it onto their node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualStyle {
    /// Background fill.
    pub background: Rgb,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl VisualStyle {
    /// Create a new style.
    pub const fn new(background: Rgb, opacity: f32) -> Self {
        Self { background, opacity }
    }

    /// Fully opaque style.
    pub const fn solid(background: Rgb) -> Self {
        Self::new(background, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_style_is_opaque() {
        let style = VisualStyle::solid(Rgb::new(0, 120, 200));
        assert_eq!(style.opacity, 1.0);
        assert_eq!(style.background, Rgb::new(0, 120, 200));
        assert_ne!(style, VisualStyle::new(Rgb::new(0, 120, 200), 0.5));
        assert_eq!(Rgb::default(), Rgb::BLACK);
    }
}
