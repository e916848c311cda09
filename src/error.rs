use derive_more::Display;

use crate::types::Value;

pub type Result<T> = core::result::Result<T, IsoSurfaceError>;

#[derive(Debug, Display, Clone, PartialEq)]
pub enum IsoSurfaceError {
    /// The sampled region must have a finite, positive extent.
    #[display("invalid grid size {grid_size}: must be finite and positive")]
    InvalidGridSize { grid_size: Value },

    /// The voxel edge length must be finite and positive.
    #[display("invalid step size {step_size}: must be finite and positive")]
    InvalidStepSize { step_size: Value },

    /// The lattice has more points than can be counted or iterated.
    #[display("grid of size {grid_size} with step {step_size} has too many cells")]
    GridTooLarge { grid_size: Value, step_size: Value },

    /// No field is registered under this name.
    #[display("unknown field {name:?}")]
    UnknownField { name: String },
}

impl std::error::Error for IsoSurfaceError {}
