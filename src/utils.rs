use crate::{
    interp::{find_t, interpolate_points},
    tables::{CORNER_OFFSETS, TRI_TABLE},
    types::{Point, Triangle, Value},
};

/// Collects the triangles for marching cubes `state` from the interpolated edge points.
///
/// `TRI_TABLE[state]` contains edge indices in groups of three, terminated by `-1`:
/// ```text
/// TRI_TABLE[state] = [e0, e1, e2,  e3, e4, e5,  -1, ...]
///                     \___tri0__/   \___tri1__/
/// ```
/// Each edge index maps into `edge_points`. Edges named by the table are always
/// flagged in `EDGE_TABLE[state]`, so a missing point means the tables disagree
/// and the group is skipped.
#[inline]
pub fn triangles_from_state(edge_points: &[Option<Point>; 12], state: usize, out: &mut Vec<Triangle>) {
    for tri in TRI_TABLE[state]
        .split(|&e| e == -1)
        .next()
        .unwrap_or_default()
        .chunks_exact(3)
    {
        if let (Some(a), Some(b), Some(c)) = (
            edge_points[tri[0] as usize],
            edge_points[tri[1] as usize],
            edge_points[tri[2] as usize],
        ) {
            out.push([a, b, c]);
        }
    }
}

/// Returns the 8 world-space corner positions of the cell whose minimum corner is `min`.
///
/// Order follows [`CORNER_OFFSETS`]; see [`tables`](crate::tables) for the diagram.
#[inline]
pub fn get_corner_positions(min: &Point, step: Value) -> [Point; 8] {
    CORNER_OFFSETS.map(|[dx, dy, dz]| {
        Point::new(
            if dx == 0 { min.x } else { min.x + step },
            if dy == 0 { min.y } else { min.y + step },
            if dz == 0 { min.z } else { min.z + step },
        )
    })
}

/// Computes the marching cubes state bitmask for a cell.
///
/// Each of the 8 corners maps to one bit. A bit is set when the corner's value
/// is strictly **below** the isovalue (i.e. "inside" the surface):
///
/// ```text
/// corner index:  7  6  5  4  3  2  1  0
/// state bits:   [_][_][_][_][_][_][_][_]
///                                      ^-- corner 0 inside?
/// ```
#[inline]
pub fn get_state(values: &[Value; 8], isovalue: Value) -> usize {
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v < isovalue)
        .fold(0, |state, (i, _)| state | (1 << i))
}

/// Interpolates the crossing point along each edge of the cell flagged in `edges_mask`.
///
/// `edges_mask` is a 12-bit field from `EDGE_TABLE`; a set bit means that edge is active.
/// The two endpoints are put in lexicographic order before interpolating so that
/// neighbouring cells sharing an edge produce the same vertex bit for bit.
#[inline]
pub fn get_edge_points(
    edges_mask: u16,
    point_indices: &[[i8; 2]; 12],
    corner_positions: &[Point; 8],
    corner_values: &[Value; 8],
    isovalue: Value,
) -> [Option<Point>; 12] {
    let mut edge_points: [Option<Point>; 12] = [None; 12];

    for (i, pair) in point_indices.iter().enumerate() {
        if (edges_mask & (1 << i)) == 0 {
            continue;
        }

        let (mut a, mut b) = (pair[0] as usize, pair[1] as usize);
        let (pa, pb) = (&corner_positions[a], &corner_positions[b]);
        if (pb.x, pb.y, pb.z) < (pa.x, pa.y, pa.z) {
            std::mem::swap(&mut a, &mut b);
        }

        let t = find_t(corner_values[a], corner_values[b], isovalue);
        edge_points[i] = Some(interpolate_points(&corner_positions[a], &corner_positions[b], t));
    }

    edge_points
}

/// Returns the `[min, max]` corners of the box enclosing every vertex of `faces`,
/// or `None` when there are no faces.
pub fn bounding_box(faces: &[Triangle]) -> Option<[Point; 2]> {
    let mut vertices = faces.iter().flatten();
    let first = *vertices.next()?;
    Some(vertices.fold([first, first], |[min, max], v| {
        [min.inf(v), max.sup(v)]
    }))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::tables::{CORNER_POINT_INDICES, EDGE_TABLE};

    #[test]
    fn corner_positions_follow_the_table_order() {
        let p = get_corner_positions(&Point::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(p[0], Point::new(1.0, 2.0, 3.5));
        assert_eq!(p[1], Point::new(1.5, 2.0, 3.5));
        assert_eq!(p[2], Point::new(1.5, 2.0, 3.0));
        assert_eq!(p[3], Point::new(1.0, 2.0, 3.0));
        assert_eq!(p[4], Point::new(1.0, 2.5, 3.5));
        assert_eq!(p[5], Point::new(1.5, 2.5, 3.5));
        assert_eq!(p[6], Point::new(1.5, 2.5, 3.0));
        assert_eq!(p[7], Point::new(1.0, 2.5, 3.0));
    }

    #[test]
    fn state_sets_a_bit_per_inside_corner() {
        let values = [-1.0, 1.0, 1.0, -0.5, 1.0, 1.0, 1.0, -2.0];
        assert_eq!(get_state(&values, 0.0), 0b1000_1001);
        assert_eq!(get_state(&[0.0; 8], 0.0), 0);
        assert_eq!(get_state(&[-0.1; 8], 0.0), 255);
    }

    #[test]
    fn value_equal_to_isovalue_counts_as_outside() {
        let mut values = [1.0; 8];
        values[5] = 0.25;
        assert_eq!(get_state(&values, 0.25), 0);
    }

    #[test]
    fn only_flagged_edges_are_interpolated() {
        let positions = get_corner_positions(&Point::origin(), 1.0);
        let values = [-1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let state = get_state(&values, 0.0);
        let points = get_edge_points(EDGE_TABLE[state], &CORNER_POINT_INDICES, &positions, &values, 0.0);

        let active: Vec<usize> = (0..12).filter(|&e| points[e].is_some()).collect();
        assert_eq!(active, vec![0, 3, 8]);
        assert_relative_eq!(points[0].unwrap(), Point::new(0.5, 0.0, 1.0));
        assert_relative_eq!(points[3].unwrap(), Point::new(0.0, 0.0, 0.5));
        assert_relative_eq!(points[8].unwrap(), Point::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn shared_edge_is_interpolated_identically_from_either_direction() {
        let positions = get_corner_positions(&Point::new(0.1, 0.2, 0.3), 0.7);
        let mut values = [0.9; 8];
        values[2] = -0.37;
        values[3] = 0.61;
        let state = get_state(&values, 0.0);
        let points = get_edge_points(EDGE_TABLE[state], &CORNER_POINT_INDICES, &positions, &values, 0.0);

        // Edge 2 runs 2 -> 3; flipping its endpoints must give the same vertex.
        let mut flipped = CORNER_POINT_INDICES;
        flipped[2] = [3, 2];
        let again = get_edge_points(EDGE_TABLE[state], &flipped, &positions, &values, 0.0);
        assert_eq!(points[2], again[2]);
    }

    #[test]
    fn bounding_box_spans_all_vertices() {
        let faces = vec![
            [Point::new(0.0, 0.0, 0.0), Point::new(1.0, -2.0, 0.5), Point::new(0.5, 0.5, 3.0)],
            [Point::new(-1.0, 0.0, 0.0), Point::new(0.0, 4.0, 0.0), Point::new(0.0, 0.0, -0.5)],
        ];
        let [min, max] = bounding_box(&faces).unwrap();
        assert_eq!(min, Point::new(-1.0, -2.0, -0.5));
        assert_eq!(max, Point::new(1.0, 4.0, 3.0));
        assert!(bounding_box(&[]).is_none());
    }
}
