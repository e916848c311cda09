/// RGBA colour with linear components in `[0, 1]`.
pub type Color = [f32; 4];

/// Opaque shading hint attached to a field.
///
/// The mesher passes it through untouched; the renderer decides what it means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialDescriptor {
    /// Dark base with a warm subsurface scattering layer.
    Subsurface {
        base_color: Color,
        subsurface: f32,
        subsurface_color: Color,
    },
    /// A single flat colour.
    SmoothColor { color: Color },
    /// Colour ramp keyed on height, for terrains and planets.
    HeightMap,
}

impl MaterialDescriptor {
    /// The subsurface material used for fractals and implicit surfaces.
    pub const fn fractal() -> Self {
        Self::Subsurface {
            base_color: [0.142, 0.082, 0.073, 1.0],
            subsurface: 0.464,
            subsurface_color: [0.8, 0.18, 0.072, 1.0],
        }
    }

    pub const fn smooth(color: Color) -> Self {
        Self::SmoothColor { color }
    }
}

impl Default for MaterialDescriptor {
    fn default() -> Self {
        Self::fractal()
    }
}
