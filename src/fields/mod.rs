//! Scalar fields that can be meshed by the marching cubes sampler.
//!
//! Every field maps a [`Point`] to a signed [`Value`] and declares the isovalue
//! its surface sits at. Points whose value is strictly below the isovalue are
//! inside. Evaluation is total: where a formula is undefined the field returns
//! [`OUTSIDE`] instead.

use std::str::FromStr;

use derive_more::{Display, From};

use crate::{
    error::IsoSurfaceError,
    types::{CompiledFunction, Point, Value},
};

pub mod fractal;
pub mod implicit;
pub mod material;
pub mod terrain;

pub use fractal::{Julia, Mandelbox, Mandelbulb, MengerSponge};
pub use implicit::{Genus2, Heart, Moebius, RevolutionSurface, Sin, Sphere, Torus};
pub use material::MaterialDescriptor;
pub use terrain::{ComplexTerrain, NoiseSettings, NoiseSource, Planet, SimpleNoiseTerrain};

/// Value substituted where a field's formula is undefined or overflows.
///
/// Large and positive, so the point reads as outside for every isovalue used here.
pub const OUTSIDE: Value = 1.0e6;

/// Replaces NaN and infinities with [`OUTSIDE`].
#[inline]
pub(crate) fn finite_or_outside(value: Value) -> Value {
    if value.is_finite() { value } else { OUTSIDE }
}

/// A function over 3D space together with the threshold its isosurface sits at.
pub trait ScalarField {
    /// Threshold separating inside (`value < isovalue`) from outside.
    fn isovalue(&self) -> Value;

    /// Evaluates the field at `point`. Must return a finite value for any finite input.
    fn test_point(&self, point: &Point) -> Value;

    /// Shading hint for whoever renders the mesh. Never interpreted here.
    fn material_descriptor(&self) -> MaterialDescriptor {
        MaterialDescriptor::fractal()
    }
}

impl<T: ScalarField + ?Sized> ScalarField for &T {
    fn isovalue(&self) -> Value {
        (**self).isovalue()
    }

    fn test_point(&self, point: &Point) -> Value {
        (**self).test_point(point)
    }

    fn material_descriptor(&self) -> MaterialDescriptor {
        (**self).material_descriptor()
    }
}

/// A closure with an isovalue, for fields outside the built-in set.
#[derive(Clone)]
pub struct FnField<F> {
    isovalue: Value,
    function: F,
}

impl<F> FnField<F>
where
    F: Fn(&Point) -> Value,
{
    pub fn new(isovalue: Value, function: F) -> Self {
        Self { isovalue, function }
    }
}

impl FnField<Box<CompiledFunction>> {
    /// Type-erased variant, for fields chosen at runtime.
    pub fn boxed(isovalue: Value, function: impl Fn(&Point) -> Value + Sync + 'static) -> Self {
        Self::new(isovalue, Box::new(function))
    }
}

impl<F> ScalarField for FnField<F>
where
    F: Fn(&Point) -> Value,
{
    fn isovalue(&self) -> Value {
        self.isovalue
    }

    fn test_point(&self, point: &Point) -> Value {
        (self.function)(point)
    }
}

/// The built-in fields, selected at construction time.
///
/// `Display` gives the registry name and `FromStr` builds the default instance
/// for a name:
///
/// ```rust
/// use marching_isosurface::fields::{Field, ScalarField};
///
/// let bulb: Field = "mandelbulb".parse().unwrap();
/// assert_eq!(bulb.to_string(), "mandelbulb");
/// assert_eq!(bulb.isovalue(), 1.0);
/// ```
#[derive(Debug, Clone, Display, From)]
pub enum Field {
    #[display("sphere")]
    Sphere(Sphere),
    #[display("torus")]
    Torus(Torus),
    #[display("heart")]
    Heart(Heart),
    #[display("menger_sponge")]
    MengerSponge(MengerSponge),
    #[display("mandelbulb")]
    Mandelbulb(Mandelbulb),
    #[display("mandelbox")]
    Mandelbox(Mandelbox),
    #[display("genus2")]
    Genus2(Genus2),
    #[display("revolution_surface")]
    RevolutionSurface(RevolutionSurface),
    #[display("moebius")]
    Moebius(Moebius),
    #[display("julia")]
    Julia(Julia),
    #[display("sin")]
    Sin(Sin),
    #[display("planet")]
    Planet(Planet),
    #[display("simple_noise_terrain")]
    SimpleNoiseTerrain(SimpleNoiseTerrain),
    #[display("complex_terrain")]
    ComplexTerrain(ComplexTerrain),
}

impl Field {
    /// Registry names of every built-in field, in declaration order.
    pub const NAMES: [&'static str; 14] = [
        "sphere",
        "torus",
        "heart",
        "menger_sponge",
        "mandelbulb",
        "mandelbox",
        "genus2",
        "revolution_surface",
        "moebius",
        "julia",
        "sin",
        "planet",
        "simple_noise_terrain",
        "complex_terrain",
    ];

    fn as_dyn(&self) -> &dyn ScalarField {
        match self {
            Field::Sphere(f) => f,
            Field::Torus(f) => f,
            Field::Heart(f) => f,
            Field::MengerSponge(f) => f,
            Field::Mandelbulb(f) => f,
            Field::Mandelbox(f) => f,
            Field::Genus2(f) => f,
            Field::RevolutionSurface(f) => f,
            Field::Moebius(f) => f,
            Field::Julia(f) => f,
            Field::Sin(f) => f,
            Field::Planet(f) => f,
            Field::SimpleNoiseTerrain(f) => f,
            Field::ComplexTerrain(f) => f,
        }
    }
}

impl ScalarField for Field {
    fn isovalue(&self) -> Value {
        self.as_dyn().isovalue()
    }

    fn test_point(&self, point: &Point) -> Value {
        self.as_dyn().test_point(point)
    }

    fn material_descriptor(&self) -> MaterialDescriptor {
        self.as_dyn().material_descriptor()
    }
}

impl FromStr for Field {
    type Err = IsoSurfaceError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let field = match name {
            "sphere" => Sphere::default().into(),
            "torus" => Torus::default().into(),
            "heart" => Heart::default().into(),
            "menger_sponge" => MengerSponge::default().into(),
            "mandelbulb" => Mandelbulb::default().into(),
            "mandelbox" => Mandelbox::default().into(),
            "genus2" => Genus2.into(),
            "revolution_surface" => RevolutionSurface::default().into(),
            "moebius" => Moebius::default().into(),
            "julia" => Julia::default().into(),
            "sin" => Sin.into(),
            "planet" => Planet::default().into(),
            "simple_noise_terrain" => SimpleNoiseTerrain::default().into(),
            "complex_terrain" => ComplexTerrain::default().into(),
            _ => {
                return Err(IsoSurfaceError::UnknownField {
                    name: name.to_owned(),
                });
            }
        };
        Ok(field)
    }
}
