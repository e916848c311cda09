//! Fold-based and escape-time fractals.
//!
//! Each loop runs for a fixed number of iterations with its own early exit;
//! changing either changes the surface.

use nalgebra::Quaternion;

use super::{OUTSIDE, ScalarField, finite_or_outside};
use crate::types::{Point, Value, Vector};

/// Signed distance to an axis-aligned box of half-extents `b` centred on the origin.
fn box_sdf(p: &Vector, b: &Vector) -> Value {
    let d = p.abs() - b;
    d.max().min(0.0) + d.sup(&Vector::zeros()).norm()
}

/// Menger sponge built by carving cross-shaped holes out of a box.
///
/// Generate with a grid of size 4 and a small step (0.05) to resolve the holes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MengerSponge {
    pub iterations: u32,
}

impl MengerSponge {
    /// Half-extent of the outer box.
    pub const HALF_EXTENT: Value = 2.0;

    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }
}

impl Default for MengerSponge {
    fn default() -> Self {
        Self { iterations: 5 }
    }
}

impl ScalarField for MengerSponge {
    fn isovalue(&self) -> Value {
        0.0
    }

    fn test_point(&self, point: &Point) -> Value {
        // Long axis of each carving bar.
        const BAR: Value = 1.0;

        let p = point.coords;
        let mut hole_width = Self::HALF_EXTENT / 3.0;
        let mut menger = box_sdf(&p, &Vector::repeat(Self::HALF_EXTENT));

        for _ in 0..self.iterations {
            let period = hole_width * 6.0;
            let q = (p + Vector::repeat(hole_width)).map(|s| s - period * (s / period).floor())
                - Vector::repeat(hole_width);

            let hole_x = box_sdf(&q, &Vector::new(BAR, hole_width, hole_width));
            let hole_y = box_sdf(&q, &Vector::new(hole_width, BAR, hole_width));
            let hole_z = box_sdf(&q, &Vector::new(hole_width, hole_width, BAR));

            hole_width /= 3.0;
            menger = menger.max(-hole_x).max(-hole_y).max(-hole_z);
        }

        menger
    }
}

/// Power-`degree` Mandelbulb in spherical coordinates.
///
/// Returns the orbit's norm as soon as it leaves the unit ball, so the value is
/// `<= 1` for points that stay bounded for `iterations` steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mandelbulb {
    pub iterations: u32,
    pub degree: Value,
}

impl Mandelbulb {
    pub fn new(iterations: u32, degree: Value) -> Self {
        Self { iterations, degree }
    }
}

impl Default for Mandelbulb {
    fn default() -> Self {
        Self::new(6, 8.0)
    }
}

impl ScalarField for Mandelbulb {
    fn isovalue(&self) -> Value {
        1.0
    }

    fn test_point(&self, point: &Point) -> Value {
        let origin = point.coords;
        let mut c = origin;
        let mut result = 0.0;

        for _ in 0..self.iterations {
            let r = c.norm();
            let theta = (c.x * c.x + c.y * c.y).sqrt().atan2(c.z) * self.degree;
            let phi = c.y.atan2(c.x) * self.degree;
            let p = r.powf(self.degree);

            let (sin_theta, cos_theta) = theta.sin_cos();
            let (sin_phi, cos_phi) = phi.sin_cos();
            c = Vector::new(
                p * sin_theta * cos_phi,
                p * sin_theta * sin_phi,
                p * cos_theta,
            ) + origin;

            result = c.norm();
            if result > 1.0 {
                break;
            }
        }

        finite_or_outside(result)
    }
}

/// Mandelbox: box fold, sphere fold, then scale and translate.
///
/// The value is the orbit's norm divided by the accumulated derivative, so it
/// stays small for points that never escape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mandelbox {
    pub scale: Value,
    pub iterations: u32,
    /// Inside this radius the sphere fold scales by a constant factor.
    pub min_radius: Value,
    /// Between `min_radius` and this radius the fold inverts in the sphere.
    pub fixed_radius: Value,
    /// Added after scaling on every iteration.
    pub offset: Vector,
}

impl Mandelbox {
    pub fn new(scale: Value, iterations: u32) -> Self {
        Self {
            scale,
            iterations,
            ..Default::default()
        }
    }
}

impl Default for Mandelbox {
    fn default() -> Self {
        Self {
            scale: 2.0,
            iterations: 10,
            min_radius: 0.5,
            fixed_radius: 1.0,
            offset: Vector::repeat(0.5),
        }
    }
}

impl ScalarField for Mandelbox {
    fn isovalue(&self) -> Value {
        1.0
    }

    fn test_point(&self, point: &Point) -> Value {
        let min_r2 = self.min_radius * self.min_radius;
        let fixed_r2 = self.fixed_radius * self.fixed_radius;

        let mut p = point.coords;
        let mut factor = 1.0;

        for _ in 0..self.iterations {
            p = p.map(|v| v.clamp(-1.0, 1.0) * 2.0 - v);

            let r2 = p.norm_squared();
            if r2 < min_r2 {
                let k = fixed_r2 / min_r2;
                p *= k;
                factor *= k;
            } else if r2 < fixed_r2 {
                let k = fixed_r2 / r2;
                p *= k;
                factor *= k;
            }

            p = p * self.scale + self.offset;
            factor *= self.scale;
        }

        if factor == 0.0 {
            return OUTSIDE;
        }
        finite_or_outside(p.norm() / factor.abs())
    }
}

/// Quaternion Julia set, evaluated with its distance estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Julia {
    /// The constant added after squaring: `(w, i, j, k)`.
    pub c: Quaternion<Value>,
    pub iterations: u32,
}

impl Default for Julia {
    fn default() -> Self {
        Self {
            c: Quaternion::new(-0.291, -0.399, 0.339, 0.437),
            iterations: 4,
        }
    }
}

impl ScalarField for Julia {
    fn isovalue(&self) -> Value {
        1.0
    }

    fn test_point(&self, point: &Point) -> Value {
        let mut z = Quaternion::new(point.x, point.y, point.z, 0.0);
        let mut mz2 = z.norm_squared();
        let mut md2 = 1.0;
        let mut n = 0;

        for _ in 0..self.iterations {
            md2 *= 4.0 * mz2;
            z = z * z + self.c;
            mz2 = z.norm_squared();
            if mz2 > 4.0 {
                break;
            }
            n += 1;
        }

        // md2 collapses to zero when the orbit passes through the origin.
        finite_or_outside(0.25 * (mz2 / md2).sqrt() * Value::powi(2.0, -n) * mz2.ln())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn box_distance_is_signed() {
        let b = Vector::repeat(1.0);
        assert_relative_eq!(box_sdf(&Vector::zeros(), &b), -1.0);
        assert_relative_eq!(box_sdf(&Vector::new(3.0, 0.0, 0.0), &b), 2.0);
        assert_relative_eq!(box_sdf(&Vector::new(2.0, 2.0, 0.0), &b), 2.0_f64.sqrt());
    }

    #[test]
    fn sponge_without_iterations_is_a_box() {
        let sponge = MengerSponge::new(0);
        assert_relative_eq!(sponge.test_point(&Point::origin()), -2.0);
        assert_relative_eq!(sponge.test_point(&Point::new(3.0, 0.0, 0.0)), 1.0);
    }

    #[test]
    fn sponge_centre_is_hollow_but_corners_are_solid() {
        let sponge = MengerSponge::new(3);
        assert!(sponge.test_point(&Point::origin()) > 0.0);
        assert!(sponge.test_point(&Point::new(1.9, 1.9, 1.9)) < 0.0);
        assert!(sponge.test_point(&Point::new(2.5, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn mandelbulb_escapes_far_points_and_keeps_the_origin() {
        let bulb = Mandelbulb::default();
        assert_eq!(bulb.test_point(&Point::origin()), 0.0);
        assert!(bulb.test_point(&Point::new(2.0, 0.0, 0.0)) > 1.0);
        assert!(bulb.test_point(&Point::new(0.0, 0.0, 0.3)) < 1.0);
        assert_eq!(Mandelbulb::new(0, 8.0).test_point(&Point::new(5.0, 5.0, 5.0)), 0.0);
    }

    #[test]
    fn mandelbulb_stops_at_the_first_escape() {
        // From (2, 0, 0) the first step already leaves the unit ball; a single
        // iteration must give the same answer as six.
        let p = Point::new(2.0, 0.0, 0.0);
        assert_eq!(Mandelbulb::new(1, 8.0).test_point(&p), Mandelbulb::new(6, 8.0).test_point(&p));
    }

    #[test]
    fn mandelbox_origin_is_inside_and_far_points_outside() {
        let mandelbox = Mandelbox::default();
        assert!(mandelbox.test_point(&Point::origin()) < 1.0);
        assert!(mandelbox.test_point(&Point::new(10.0, 10.0, 10.0)) > 1.0);
    }

    #[test]
    fn mandelbox_with_zero_scale_is_outside() {
        assert_eq!(Mandelbox::new(0.0, 3).test_point(&Point::new(0.2, 0.1, 0.0)), OUTSIDE);
    }

    #[test]
    fn julia_distance_grows_away_from_the_set() {
        let julia = Julia::default();
        let near = julia.test_point(&Point::new(3.0, 0.0, 0.0));
        let far = julia.test_point(&Point::new(10.0, 0.0, 0.0));
        assert!(near > 1.0);
        assert!(far > near);
    }

    #[test]
    fn julia_degenerate_orbit_is_outside() {
        assert_eq!(Julia::default().test_point(&Point::origin()), OUTSIDE);
    }

    #[test]
    fn one_sponge_iteration_carves_the_axis_holes() {
        let sponge = MengerSponge::new(1);
        // Centre of the z hole: 0.5 from its end face at z = 1.
        assert_relative_eq!(sponge.test_point(&Point::new(0.0, 0.0, 0.5)), 0.5, epsilon = 1e-12);
        // Solid, 0.2 below the nearest hole wall.
        assert_relative_eq!(sponge.test_point(&Point::new(0.1, 0.2, 1.2)), -0.2, epsilon = 1e-12);
    }

    #[test]
    fn mandelbulb_adds_back_the_starting_point() {
        let p = Point::new(0.5, 0.4, 0.3);
        assert_relative_eq!(Mandelbulb::new(1, 8.0).test_point(&p), 0.6849563838559494, epsilon = 1e-12);
        // Adding the current iterate instead would give 0.6726956474602925.
        assert_relative_eq!(Mandelbulb::new(2, 8.0).test_point(&p), 0.6916714493832187, epsilon = 1e-12);
    }

    #[test]
    fn mandelbox_single_iteration_through_each_fold() {
        let once = Mandelbox::new(2.0, 1);

        // r² = 0.14 < 0.25: scaled by 4, then (1.3, 2.1, 2.9) / 8.
        let inner = 14.51_f64.sqrt() / 8.0;
        assert_relative_eq!(once.test_point(&Point::new(0.1, 0.2, 0.3)), inner, epsilon = 1e-12);

        // r² = 0.5: inverted to (1, 1, 0), then (2.5, 2.5, 0.5) / 4.
        let shell = 12.75_f64.sqrt() / 4.0;
        assert_relative_eq!(once.test_point(&Point::new(0.5, 0.5, 0.0)), shell, epsilon = 1e-12);

        // r² = 1.45: untouched, then (2.3, 0.5, 2.1) / 2.
        let outer = 9.95_f64.sqrt() / 2.0;
        assert_relative_eq!(once.test_point(&Point::new(0.9, 0.0, 0.8)), outer, epsilon = 1e-12);

        // x = 1.5 box-folds to 0.5, lands on r² = 0.25, inverted to (2, 0, 0), then (4.5, 0.5, 0.5) / 8.
        let folded = 20.75_f64.sqrt() / 8.0;
        assert_relative_eq!(once.test_point(&Point::new(1.5, 0.0, 0.0)), folded, epsilon = 1e-12);
    }

    #[test]
    fn julia_distance_estimate_counts_completed_steps() {
        // From (1, 0, 0) the orbit stays bounded for two steps and escapes on the third,
        // with mz2 = 8.70281201494301 and md2 = 172.40124779052778 accumulated before each step.
        let (mz2, md2): (Value, Value) = (8.70281201494301, 172.40124779052778);
        let expected = 0.25 * (mz2 / md2).sqrt() * 0.25 * mz2.ln();
        let value = Julia::default().test_point(&Point::new(1.0, 0.0, 0.0));
        assert_relative_eq!(value, expected, epsilon = 1e-9);
        assert_relative_eq!(value, 0.03038266473046346, epsilon = 1e-12);
    }
}
