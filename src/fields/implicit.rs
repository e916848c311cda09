//! Closed-form implicit surfaces.

use super::{MaterialDescriptor, OUTSIDE, ScalarField};
use crate::types::{Point, Value, Vector};

const SMOOTH_BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// `|p|² - radius`. Note the radius is not squared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub radius: Value,
}

impl Sphere {
    pub fn new(radius: Value) -> Self {
        Self { radius }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

impl ScalarField for Sphere {
    fn isovalue(&self) -> Value {
        0.0
    }

    fn test_point(&self, point: &Point) -> Value {
        point.coords.norm_squared() - self.radius
    }

    fn material_descriptor(&self) -> MaterialDescriptor {
        MaterialDescriptor::smooth(SMOOTH_BLACK)
    }
}

/// Quartic torus around the z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    /// Distance from the centre to the middle of the tube.
    pub major_radius: Value,
    /// Radius of the tube.
    pub minor_radius: Value,
}

impl Torus {
    pub fn new(major_radius: Value, minor_radius: Value) -> Self {
        Self {
            major_radius,
            minor_radius,
        }
    }
}

impl Default for Torus {
    fn default() -> Self {
        Self::new(2.0, 1.0)
    }
}

impl ScalarField for Torus {
    fn isovalue(&self) -> Value {
        0.0
    }

    fn test_point(&self, point: &Point) -> Value {
        let r2 = self.major_radius * self.major_radius;
        let power = point.coords.norm_squared() + r2 - self.minor_radius * self.minor_radius;
        power * power - 4.0 * r2 * (point.x * point.x + point.y * point.y)
    }

    fn material_descriptor(&self) -> MaterialDescriptor {
        MaterialDescriptor::smooth(SMOOTH_BLACK)
    }
}

/// Taubin's heart surface; `stretch` scales the y-dependent lobe term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heart {
    pub stretch: Value,
}

impl Heart {
    pub fn new(stretch: Value) -> Self {
        Self { stretch }
    }
}

impl Default for Heart {
    fn default() -> Self {
        Self { stretch: 1.0 }
    }
}

impl ScalarField for Heart {
    fn isovalue(&self) -> Value {
        0.0
    }

    fn test_point(&self, point: &Point) -> Value {
        let (x, y, z) = (point.x, point.y, point.z);
        let cube = x * x + 9.0 / 4.0 * y * y + z * z - 1.0;
        let z3 = z * z * z;
        cube * cube * cube - x * x * z3 - (9.0 * y * y * z3) / 200.0 * self.stretch
    }
}

/// A closed surface with two handles.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Genus2;

impl ScalarField for Genus2 {
    fn isovalue(&self) -> Value {
        0.0
    }

    fn test_point(&self, point: &Point) -> Value {
        let (x, y, z) = (point.x, point.y, point.z);
        let rho2 = x * x + y * y;
        2.0 * y * (y * y - 3.0 * x * x) * (1.0 - z * z) + rho2 * rho2
            - (9.0 * z * z - 1.0) * (1.0 - z * z)
    }
}

/// The curve `ln(z + height)` revolved around the z axis, thickened by `radius`.
///
/// Below `z = -height` the logarithm is undefined and the point is outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevolutionSurface {
    pub height: Value,
    pub radius: Value,
}

impl RevolutionSurface {
    pub fn new(height: Value, radius: Value) -> Self {
        Self { height, radius }
    }
}

impl Default for RevolutionSurface {
    fn default() -> Self {
        Self::new(3.2, 0.02)
    }
}

impl ScalarField for RevolutionSurface {
    fn isovalue(&self) -> Value {
        0.0
    }

    fn test_point(&self, point: &Point) -> Value {
        let shifted = point.z + self.height;
        if shifted <= 0.0 {
            return OUTSIDE;
        }
        let ln_z = shifted.ln();
        point.x * point.x + point.y * point.y - ln_z * ln_z - self.radius
    }
}

/// Cubic Möbius strip; `curve` controls the twist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moebius {
    pub curve: Value,
}

impl Moebius {
    pub fn new(curve: Value) -> Self {
        Self { curve }
    }
}

impl Default for Moebius {
    fn default() -> Self {
        Self { curve: 2.0 }
    }
}

impl ScalarField for Moebius {
    fn isovalue(&self) -> Value {
        0.0
    }

    fn test_point(&self, point: &Point) -> Value {
        let (x, y, z) = (point.x, point.y, point.z);
        let c = self.curve;
        x * x * y + y * z * z + y * y * y - y - c * x * z - c * x * x * z - c * y * y * z
    }
}

/// A thin slab across the `(1, 1, 1)` diagonal, cut off beyond radius 1.7.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sin;

impl ScalarField for Sin {
    fn isovalue(&self) -> Value {
        0.0
    }

    fn test_point(&self, point: &Point) -> Value {
        let shifted = point.coords * 3.0 + Vector::repeat(3.0);
        let plane = shifted.dot(&Vector::repeat(1.0));
        let overshoot = (point.coords.norm() - 1.7).max(0.0);
        0.1 - plane * plane - 10.0 * overshoot * overshoot
    }
}
