//! Fields perturbed by coherent noise: a planet and two height-field terrains.

use std::fmt;

use bevy_math::Vec3;
use noiz::prelude::*;

use super::{MaterialDescriptor, ScalarField};
use crate::types::{Point, Value, Vector};

type Gradients = MixCellGradients<OrthoGrid, Smoothstep, QuickGradients>;
type Perlin = Noise<LayeredNoise<Normed<f32>, Persistence, Octave<Gradients>>>;
type FractalPerlin = Noise<LayeredNoise<Normed<f32>, Persistence, FractalLayers<Octave<Gradients>>>>;

/// Everything needed to build a [`NoiseSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseSettings {
    /// Base frequency of the first octave.
    pub frequency: f32,
    /// Octaves summed by [`NoiseSource::sample_fractal`]. At least one is always used.
    pub octaves: u32,
    /// Amplitude falloff between successive octaves.
    pub persistence: f32,
    /// Frequency growth between successive octaves.
    pub lacunarity: f32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Gradient noise with a fixed base frequency, plus its fractal sum.
/// Deterministic: the same point always samples the same value.
pub struct NoiseSource {
    settings: NoiseSettings,
    base: Perlin,
    fractal: FractalPerlin,
}

impl NoiseSource {
    pub fn new(frequency: f32) -> Self {
        Self::from_settings(NoiseSettings {
            frequency,
            ..Default::default()
        })
    }

    pub fn from_settings(settings: NoiseSettings) -> Self {
        let mut base = Perlin::default();
        base.set_frequency(settings.frequency);

        let mut fractal = FractalPerlin::from(LayeredNoise::new(
            Normed::default(),
            Persistence(settings.persistence),
            FractalLayers {
                layer: Octave::default(),
                lacunarity: settings.lacunarity,
                amount: settings.octaves.max(1),
            },
        ));
        fractal.set_frequency(settings.frequency);

        Self {
            settings,
            base,
            fractal,
        }
    }

    pub fn with_octaves(self, octaves: u32) -> Self {
        Self::from_settings(NoiseSettings {
            octaves,
            ..self.settings
        })
    }

    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    pub fn frequency(&self) -> f32 {
        self.settings.frequency
    }

    pub fn octaves(&self) -> u32 {
        self.settings.octaves.max(1)
    }

    /// Samples a single octave at `point`, roughly in `[-1, 1]`.
    pub fn sample(&self, point: &Point) -> Value {
        let value: f32 = self.base.sample_for(to_vec3(point));
        value as Value
    }

    /// Samples the normalised sum of all configured octaves at `point`.
    pub fn sample_fractal(&self, point: &Point) -> Value {
        let value: f32 = self.fractal.sample_for(to_vec3(point));
        value as Value
    }
}

fn to_vec3(point: &Point) -> Vec3 {
    Vec3::new(point.x as f32, point.y as f32, point.z as f32)
}

impl Default for NoiseSource {
    fn default() -> Self {
        Self::from_settings(NoiseSettings::default())
    }
}

impl Clone for NoiseSource {
    fn clone(&self) -> Self {
        Self::from_settings(self.settings)
    }
}

impl fmt::Debug for NoiseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseSource")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// A sphere whose surface is displaced along the radius by fractal noise.
#[derive(Debug, Clone)]
pub struct Planet {
    pub radius: Value,
    pub noise: NoiseSource,
}

impl Planet {
    pub fn new(radius: Value) -> Self {
        Self {
            radius,
            ..Default::default()
        }
    }

    pub fn with_noise(mut self, noise: NoiseSource) -> Self {
        self.noise = noise;
        self
    }
}

impl Default for Planet {
    fn default() -> Self {
        Self {
            radius: 1.5,
            noise: NoiseSource::new(2.0).with_octaves(5),
        }
    }
}

impl ScalarField for Planet {
    fn isovalue(&self) -> Value {
        0.0
    }

    fn test_point(&self, point: &Point) -> Value {
        let sphere = point.coords.norm() - self.radius;
        let direction = point.coords.try_normalize(0.0).unwrap_or_else(Vector::zeros);
        sphere + self.noise.sample_fractal(&Point::from(direction)) * (self.radius / 3.0)
    }

    fn material_descriptor(&self) -> MaterialDescriptor {
        MaterialDescriptor::HeightMap
    }
}

/// The surface `z = noise(p)`.
#[derive(Debug, Clone, Default)]
pub struct SimpleNoiseTerrain {
    pub noise: NoiseSource,
}

impl SimpleNoiseTerrain {
    pub fn new(noise: NoiseSource) -> Self {
        Self { noise }
    }
}

impl ScalarField for SimpleNoiseTerrain {
    fn isovalue(&self) -> Value {
        0.0
    }

    fn test_point(&self, point: &Point) -> Value {
        self.noise.sample(point) - point.z
    }

    fn material_descriptor(&self) -> MaterialDescriptor {
        MaterialDescriptor::HeightMap
    }
}

/// Fractal height field over the xy plane with a layer of 3D noise on top,
/// which carves overhangs the plain height field cannot.
#[derive(Debug, Clone)]
pub struct ComplexTerrain {
    /// Height of the fractal layer.
    pub amplitude: Value,
    pub noise: NoiseSource,
}

impl ComplexTerrain {
    /// Weight of the 3D overhang layer.
    const OVERHANG: Value = 0.25;

    pub fn new(amplitude: Value, octaves: u32) -> Self {
        Self {
            amplitude,
            noise: NoiseSource::default().with_octaves(octaves),
        }
    }
}

impl Default for ComplexTerrain {
    fn default() -> Self {
        Self::new(1.0, 6)
    }
}

impl ScalarField for ComplexTerrain {
    fn isovalue(&self) -> Value {
        0.0
    }

    fn test_point(&self, point: &Point) -> Value {
        let ground = Point::new(point.x, point.y, 0.0);
        let height = self.noise.sample_fractal(&ground) * self.amplitude;
        let overhang = self.noise.sample(&Point::from(point.coords * 2.0)) * Self::OVERHANG;
        height + overhang - point.z
    }

    fn material_descriptor(&self) -> MaterialDescriptor {
        MaterialDescriptor::HeightMap
    }
}
