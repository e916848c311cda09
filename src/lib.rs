//! Marching cubes isosurface extraction over a library of scalar fields.
//!
//! Pick a [`ScalarField`] (one of the built-in [`Field`]s or your own closure
//! wrapped in [`FnField`]), describe the sampling lattice with a [`GridConfig`]
//! and let [`IsoSurfaceGenerator`] turn the field into a flat list of triangles.
//!
//! ```rust
//! use marching_isosurface::{GridConfig, IsoSurfaceGenerator, fields::Sphere};
//!
//! let mut generator = IsoSurfaceGenerator::new(Sphere::new(1.0), GridConfig::new(4.0, 0.5));
//! generator.generate_mesh()?;
//! assert!(!generator.faces().is_empty());
//! # Ok::<(), marching_isosurface::IsoSurfaceError>(())
//! ```

pub mod cell;
pub mod config;
pub mod error;
pub mod fields;
pub mod generator;
pub mod interp;
pub mod tables;
pub mod types;
pub mod utils;

pub use config::GridConfig;
pub use error::{IsoSurfaceError, Result};
pub use fields::{Field, FnField, MaterialDescriptor, ScalarField};
pub use generator::{IsoSurfaceGenerator, march};
pub use types::{Point, Triangle, Value};
