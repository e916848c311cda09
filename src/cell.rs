use crate::{
    fields::ScalarField,
    tables::{CORNER_POINT_INDICES, EDGE_TABLE},
    types::{Point, Triangle, Value},
    utils::{get_corner_positions, get_edge_points, get_state, triangles_from_state},
};

/// The 8 corner samples of one cubic cell.
///
/// Corners keep the fixed order documented in [`tables`](crate::tables); the
/// lookup tables are only valid for that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub positions: [Point; 8],
    pub values: [Value; 8],
}

impl GridCell {
    pub fn new(positions: [Point; 8], values: [Value; 8]) -> Self {
        Self { positions, values }
    }

    /// Samples `field` at the corners of the cell with minimum corner `min` and edge length `step`.
    pub fn sample<F: ScalarField + ?Sized>(field: &F, min: &Point, step: Value) -> Self {
        let positions = get_corner_positions(min, step);
        let values = positions.map(|p| field.test_point(&p));
        Self { positions, values }
    }

    /// The 8-bit inside/outside configuration of this cell against `isovalue`.
    pub fn state(&self, isovalue: Value) -> usize {
        get_state(&self.values, isovalue)
    }

    /// Appends the 0 to 5 triangles approximating the isosurface inside this cell.
    ///
    /// Returns the number of triangles appended. Depends on nothing but the
    /// samples and `isovalue`.
    ///
    /// ```text
    /// 1. get_state             →  256-entry lookup key
    /// 2. EDGE_TABLE[state]     →  bitmask of crossed edges
    /// 3. get_edge_points       →  up to 12 interpolated points
    /// 4. triangles_from_state  →  triangles from TRI_TABLE
    /// ```
    pub fn triangulate_into(&self, isovalue: Value, out: &mut Vec<Triangle>) -> usize {
        let state = self.state(isovalue);
        if state == 0 || state == 255 {
            return 0;
        }

        let edge_points = get_edge_points(
            EDGE_TABLE[state],
            &CORNER_POINT_INDICES,
            &self.positions,
            &self.values,
            isovalue,
        );

        let before = out.len();
        triangles_from_state(&edge_points, state, out);
        out.len() - before
    }

    /// Like [`triangulate_into`](GridCell::triangulate_into), collecting into a new `Vec`.
    pub fn triangulate(&self, isovalue: Value) -> Vec<Triangle> {
        let mut out = Vec::with_capacity(5);
        self.triangulate_into(isovalue, &mut out);
        out
    }
}
