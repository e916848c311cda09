use std::ops::Range;

use ndarray::{Array2, Zip};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    cell::GridCell,
    config::GridConfig,
    error::Result,
    fields::{MaterialDescriptor, ScalarField},
    tables::CORNER_OFFSETS,
    types::{Triangle, Value},
};

/// Meshes the isosurface of a [`ScalarField`] over a cubic lattice.
///
/// ```text
/// new(field, config)
///   → generate_mesh()      sweep the lattice, triangulate every cell
///   → faces()              flat triangle list
///   → generate_mesh()      again: the face list is rebuilt, not appended to
/// ```
///
/// The face list is the only output. Vertices shared between neighbouring
/// cells are repeated; welding and normals are up to the consumer.
#[derive(Debug, Clone)]
pub struct IsoSurfaceGenerator<F> {
    field: F,
    config: GridConfig,
    faces: Vec<Triangle>,
}

impl<F> IsoSurfaceGenerator<F>
where
    F: ScalarField + Sync,
{
    pub fn new(field: F, config: GridConfig) -> Self {
        Self {
            field,
            config,
            faces: Vec::new(),
        }
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Replaces the grid configuration. Takes effect on the next [`generate_mesh`](Self::generate_mesh).
    pub fn set_config(&mut self, config: GridConfig) {
        self.config = config;
    }

    /// The field's shading hint, passed through unchanged.
    pub fn material_descriptor(&self) -> MaterialDescriptor {
        self.field.material_descriptor()
    }

    /// Samples the field and rebuilds the face list.
    ///
    /// Fails only when the grid configuration is invalid, in which case the
    /// previous faces are left untouched. Repeated calls with the same field and
    /// configuration produce the same faces in the same order.
    pub fn generate_mesh(&mut self) -> Result<()> {
        let span = tracing::info_span!(
            "generate_mesh",
            grid_size = self.config.grid_size,
            step_size = self.config.step_size
        );
        let _enter = span.enter();

        self.faces = march(&self.field, &self.config).inspect_err(|err| {
            log::warn!("rejected grid configuration: {err}");
        })?;

        log::info!("End of mesh generation found {} faces", self.faces.len());
        Ok(())
    }

    /// Faces produced by the last successful [`generate_mesh`](Self::generate_mesh).
    pub fn faces(&self) -> &[Triangle] {
        &self.faces
    }

    pub fn into_faces(self) -> Vec<Triangle> {
        self.faces
    }
}

/// Runs the marching cubes algorithm for `field` over the lattice described by `config`.
///
/// The lattice is swept along x one plane of samples at a time: each cell row
/// reads its 8 corners from the plane at its own x index and the next one, so
/// memory stays at two planes per worker plus the face buffer. Work is split
/// into contiguous x slabs (in parallel with the `parallel` feature) and the
/// slabs are concatenated in order, so the result is the same as a plain x, y,
/// z triple loop.
///
/// ```text
/// Per cell:
/// 1. CORNER_OFFSETS              →  8 lattice points in table order
/// 2. lower/upper plane [[j, k]]  →  8 scalar values
/// 3. GridCell::triangulate       →  0 to 5 triangles
/// ```
pub fn march<F>(field: &F, config: &GridConfig) -> Result<Vec<Triangle>>
where
    F: ScalarField + Sync + ?Sized,
{
    config.validate()?;

    let cells = config.cells_per_axis();
    tracing::debug!(cells, isovalue = field.isovalue(), "sweeping lattice");

    Ok(march_slabs(field, config, slab_ranges(cells, slab_count())))
}

#[cfg(feature = "parallel")]
fn slab_count() -> usize {
    // A few slabs per thread keeps workers busy when surface density is uneven.
    rayon::current_num_threads() * 4
}

#[cfg(not(feature = "parallel"))]
fn slab_count() -> usize {
    1
}

/// Splits `0..cells` into at most `count` contiguous, ordered ranges.
fn slab_ranges(cells: usize, count: usize) -> Vec<Range<usize>> {
    let width = cells.div_ceil(count.max(1)).max(1);
    (0..cells)
        .step_by(width)
        .map(|start| start..(start + width).min(cells))
        .collect()
}

/// Triangulates every slab and merges the results in slab order.
fn march_slabs<F>(field: &F, config: &GridConfig, slabs: Vec<Range<usize>>) -> Vec<Triangle>
where
    F: ScalarField + Sync + ?Sized,
{
    let cells = config.cells_per_axis();
    let slab = |xs: Range<usize>| march_slab(field, config, cells, xs);

    #[cfg(feature = "parallel")]
    let per_slab: Vec<Vec<Triangle>> = slabs.into_par_iter().map(slab).collect();
    #[cfg(not(feature = "parallel"))]
    let per_slab: Vec<Vec<Triangle>> = slabs.into_iter().map(slab).collect();

    // Merge per-slab buffers into a single face buffer
    let total: usize = per_slab.iter().map(|v| v.len()).sum();
    let mut faces: Vec<Triangle> = Vec::with_capacity(total);
    for mut v in per_slab {
        faces.append(&mut v);
    }
    faces
}

/// Triangulates the cells whose minimum corner has an x index in `xs`,
/// carrying the upper plane of one slice over as the lower plane of the next.
fn march_slab<F>(field: &F, config: &GridConfig, cells: usize, xs: Range<usize>) -> Vec<Triangle>
where
    F: ScalarField + ?Sized,
{
    let isovalue = field.isovalue();
    let mut local: Vec<Triangle> = Vec::new();
    let mut lower = sample_plane(field, config, cells + 1, xs.start);

    for i in xs {
        let upper = sample_plane(field, config, cells + 1, i + 1);
        march_slice(&lower, &upper, config, cells, i, isovalue, &mut local);
        lower = upper;
    }

    local
}

/// Evaluates `field` on the `points × points` lattice plane at x index `i`, indexed `[y][z]`.
fn sample_plane<F>(field: &F, config: &GridConfig, points: usize, i: usize) -> Array2<Value>
where
    F: ScalarField + ?Sized,
{
    let mut plane = Array2::<Value>::zeros((points, points));
    Zip::indexed(&mut plane).for_each(|(j, k), value| {
        *value = field.test_point(&config.lattice_point(i, j, k));
    });
    plane
}

/// Triangulates every cell between the sample planes at x indices `i` and `i + 1`.
fn march_slice(
    lower: &Array2<Value>,
    upper: &Array2<Value>,
    config: &GridConfig,
    cells: usize,
    i: usize,
    isovalue: Value,
    out: &mut Vec<Triangle>,
) {
    for j in 0..cells {
        for k in 0..cells {
            let positions =
                CORNER_OFFSETS.map(|[dx, dy, dz]| config.lattice_point(i + dx, j + dy, k + dz));
            let values = CORNER_OFFSETS.map(|[dx, dy, dz]| {
                let plane = if dx == 0 { lower } else { upper };
                plane[[j + dy, k + dz]]
            });
            GridCell::new(positions, values).triangulate_into(isovalue, out);
        }
    }
}
