use crate::{
    error::{IsoSurfaceError, Result},
    types::{Point, Value},
};

/// Sampling grid for [`IsoSurfaceGenerator`](crate::generator::IsoSurfaceGenerator).
///
/// The lattice covers `[low, high)` on every axis, where
///
/// ```text
///  low  = -grid_size/2 - step_size
///  high =  grid_size/2 + step_size
/// ```
///
/// so the region of interest is padded by one cell on each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Extent of the sampled region along each axis, centred on the origin.
    pub grid_size: Value,
    /// World-space length of each cell edge.
    pub step_size: Value,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 4.0,
            step_size: 0.05,
        }
    }
}

impl GridConfig {
    pub fn new(grid_size: Value, step_size: Value) -> Self {
        Self {
            grid_size,
            step_size,
        }
    }

    pub fn with_grid_size(mut self, grid_size: Value) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_step_size(mut self, step_size: Value) -> Self {
        self.step_size = step_size;
        self
    }

    /// Rejects sizes that would make the sampler loop forever, divide by zero
    /// or overflow its cell count.
    pub fn validate(&self) -> Result<()> {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(IsoSurfaceError::InvalidGridSize {
                grid_size: self.grid_size,
            });
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(IsoSurfaceError::InvalidStepSize {
                step_size: self.step_size,
            });
        }
        if self.checked_cells_per_axis().is_none() {
            return Err(IsoSurfaceError::GridTooLarge {
                grid_size: self.grid_size,
                step_size: self.step_size,
            });
        }
        Ok(())
    }

    /// Returns `(low, high)`, the lattice bounds shared by all three axes.
    pub fn bounds(&self) -> (Value, Value) {
        let half = self.grid_size / 2.0;
        (-half - self.step_size, half + self.step_size)
    }

    /// Number of cells along each axis: the count of `n` with `low + n * step_size < high`.
    ///
    /// Zero for a configuration that does not pass [`validate`](Self::validate).
    pub fn cells_per_axis(&self) -> usize {
        self.checked_cells_per_axis().unwrap_or(0)
    }

    /// The cell count, or `None` when it is undefined or the `(n + 1)³` lattice
    /// points would overflow `usize`.
    fn checked_cells_per_axis(&self) -> Option<usize> {
        let (low, high) = self.bounds();
        let span = (high - low) / self.step_size;
        if !span.is_finite() || span < 0.0 || span >= usize::MAX as Value {
            return None;
        }

        // Leave room for the guard loops below to step one past the estimate.
        let estimate = span.ceil() as usize;
        let points = estimate.checked_add(2)?;
        points.checked_mul(points)?.checked_mul(points)?;

        let mut n = estimate;
        // Guard against the division rounding one step past or short of `high`.
        while n > 0 && self.coordinate(n - 1) >= high {
            n -= 1;
        }
        while n <= estimate && self.coordinate(n) < high {
            n += 1;
        }
        Some(n)
    }

    /// World-space coordinate of lattice index `n` on any axis.
    #[inline]
    pub fn coordinate(&self, n: usize) -> Value {
        let (low, _) = self.bounds();
        low + n as Value * self.step_size
    }

    /// World-space position of lattice point `(i, j, k)`.
    #[inline]
    pub fn lattice_point(&self, i: usize, j: usize, k: usize) -> Point {
        Point::new(self.coordinate(i), self.coordinate(j), self.coordinate(k))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn bounds_pad_the_grid_by_one_step() {
        let (low, high) = GridConfig::new(4.0, 0.5).bounds();
        assert_relative_eq!(low, -2.5);
        assert_relative_eq!(high, 2.5);
    }

    #[test]
    fn cell_count_matches_a_half_open_range() {
        assert_eq!(GridConfig::new(4.0, 0.5).cells_per_axis(), 10);
        assert_eq!(GridConfig::new(8.0, 0.25).cells_per_axis(), 34);
        // 4.6 / 0.3 is not a whole number of steps; the partial cell is kept.
        let config = GridConfig::new(4.0, 0.3);
        let n = config.cells_per_axis();
        let (_, high) = config.bounds();
        assert!(config.coordinate(n - 1) < high);
        assert!(config.coordinate(n) >= high);
    }

    #[test]
    fn default_matches_the_fine_sponge_grid() {
        let config = GridConfig::default();
        assert_eq!(config, GridConfig::new(4.0, 0.05));
        assert!(config.validate().is_ok());
        assert_eq!(config.cells_per_axis(), 82);
    }

    #[test]
    fn non_positive_or_non_finite_sizes_are_rejected() {
        assert_eq!(
            GridConfig::new(4.0, 0.0).validate(),
            Err(IsoSurfaceError::InvalidStepSize { step_size: 0.0 })
        );
        assert_eq!(
            GridConfig::new(-1.0, 0.1).validate(),
            Err(IsoSurfaceError::InvalidGridSize { grid_size: -1.0 })
        );
        assert!(GridConfig::new(4.0, -0.1).validate().is_err());
        assert!(GridConfig::new(Value::INFINITY, 0.1).validate().is_err());
        assert!(GridConfig::new(4.0, Value::NAN).validate().is_err());
    }

    #[test]
    fn grids_with_uncountable_cells_are_rejected() {
        let huge = GridConfig::new(1.0e20, 1.0);
        assert_eq!(
            huge.validate(),
            Err(IsoSurfaceError::GridTooLarge {
                grid_size: 1.0e20,
                step_size: 1.0
            })
        );
        assert_eq!(huge.cells_per_axis(), 0);

        // Fits in usize per axis, but not cubed.
        let dense = GridConfig::new(1.0e6, 1.0e-3);
        assert!(matches!(dense.validate(), Err(IsoSurfaceError::GridTooLarge { .. })));
        assert_eq!(dense.cells_per_axis(), 0);

        assert!(GridConfig::new(Value::MAX, Value::MIN_POSITIVE).validate().is_err());
    }

    #[test]
    fn invalid_sizes_have_no_cells() {
        assert_eq!(GridConfig::new(4.0, 0.0).cells_per_axis(), 0);
        assert_eq!(GridConfig::new(Value::NAN, 0.5).cells_per_axis(), 0);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = GridConfig::default().with_grid_size(2.0).with_step_size(0.25);
        assert_eq!(config, GridConfig::new(2.0, 0.25));
        assert_eq!(config.lattice_point(0, 1, 2), Point::new(-1.25, -1.0, -0.75));
    }
}
