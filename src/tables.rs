//! Static lookup tables for voxel construction and dual contouring.
//!
//! Corner (and child octant) `i` sits at offset `(i >> 2 & 1, i >> 1 & 1, i & 1)`
//! in `(x, y, z)`. The winding of emitted triangles depends on these exact
//! conventions, so every table below is expressed in terms of them.

/// Offsets of the 8 cube corners, indexed by corner.
pub const CORNER_OFFSETS: [[u32; 3]; 8] = [
    [0, 0, 0],
    [0, 0, 1],
    [0, 1, 0],
    [0, 1, 1],
    [1, 0, 0],
    [1, 0, 1],
    [1, 1, 0],
    [1, 1, 1],
];

/// Corner pairs of the 12 cube edges. Edges 0-3 run along X, 4-7 along Y and
/// 8-11 along Z.
pub const EDGES: [[u8; 2]; 12] = [
    // X
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
    // Y
    [0, 2],
    [1, 3],
    [4, 6],
    [5, 7],
    // Z
    [0, 1],
    [2, 3],
    [4, 5],
    [6, 7],
];

/// Unit step along each grid axis.
pub const AXIS_OFFSETS: [[u32; 3]; 3] = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

/// Corners whose offsets, subtracted from the start of an edge along the
/// indexed axis, yield the up to 4 grid cells sharing that edge.
pub const EDGE_CELL_CORNERS: [[usize; 4]; 3] = [[0, 1, 2, 3], [0, 1, 4, 5], [0, 2, 4, 6]];

/// Child pairs `[c0, c1, dir]` for the 12 faces on the interior of a cell.
pub const CELL_PROC_FACE_MASK: [[usize; 3]; 12] = [
    [0, 4, 0],
    [1, 5, 0],
    [2, 6, 0],
    [3, 7, 0],
    [0, 2, 1],
    [4, 6, 1],
    [1, 3, 1],
    [5, 7, 1],
    [0, 1, 2],
    [2, 3, 2],
    [4, 5, 2],
    [6, 7, 2],
];

/// Child quartets `[c0, c1, c2, c3, dir]` for the 6 edges on the interior of a
/// cell.
pub const CELL_PROC_EDGE_MASK: [[usize; 5]; 6] = [
    [0, 1, 2, 3, 0],
    [4, 5, 6, 7, 0],
    [0, 4, 1, 5, 1],
    [2, 6, 3, 7, 1],
    [0, 2, 4, 6, 2],
    [1, 3, 5, 7, 2],
];

/// Per face direction, the 4 child face pairs `[c0, c1, dir]` on the interior
/// of a face.
pub const FACE_PROC_FACE_MASK: [[[usize; 3]; 4]; 3] = [
    [[4, 0, 0], [5, 1, 0], [6, 2, 0], [7, 3, 0]],
    [[2, 0, 1], [6, 4, 1], [3, 1, 1], [7, 5, 1]],
    [[1, 0, 2], [3, 2, 2], [5, 4, 2], [7, 6, 2]],
];

/// Per face direction, the 4 edges `[order, c0, c1, c2, c3, dir]` on the
/// interior of a face. `order` selects a row of [`FACE_PROC_EDGE_ORDERS`].
pub const FACE_PROC_EDGE_MASK: [[[usize; 6]; 4]; 3] = [
    [
        [1, 4, 0, 5, 1, 1],
        [1, 6, 2, 7, 3, 1],
        [0, 4, 6, 0, 2, 2],
        [0, 5, 7, 1, 3, 2],
    ],
    [
        [0, 2, 3, 0, 1, 0],
        [0, 6, 7, 4, 5, 0],
        [1, 2, 0, 6, 4, 2],
        [1, 3, 1, 7, 5, 2],
    ],
    [
        [1, 1, 0, 3, 2, 0],
        [1, 5, 4, 7, 6, 0],
        [0, 1, 5, 0, 4, 1],
        [0, 3, 7, 2, 6, 1],
    ],
];

/// Which of the two face octants each of the 4 edge octants is taken from.
pub const FACE_PROC_EDGE_ORDERS: [[usize; 4]; 2] = [[0, 0, 1, 1], [0, 1, 0, 1]];

/// Per edge direction, the 2 child edge quartets `[c0, c1, c2, c3, dir]`
/// that bisect an edge.
pub const EDGE_PROC_EDGE_MASK: [[[usize; 5]; 2]; 3] = [
    [[3, 2, 1, 0, 0], [7, 6, 5, 4, 0]],
    [[5, 1, 4, 0, 1], [7, 3, 6, 2, 1]],
    [[6, 4, 2, 0, 2], [7, 5, 3, 1, 2]],
];

/// Per edge direction, the cube edge of each of the 4 octants that coincides
/// with the shared edge.
pub const PROC_EDGE_MASK: [[usize; 4]; 3] = [[3, 2, 1, 0], [7, 5, 6, 4], [11, 10, 9, 8]];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn edges_connect_corners_along_their_axis() {
        for (edge, &[c0, c1]) in EDGES.iter().enumerate() {
            let axis = edge / 4;
            let a = CORNER_OFFSETS[c0 as usize];
            let b = CORNER_OFFSETS[c1 as usize];
            for d in 0..3 {
                let expected = if d == axis { a[d] + 1 } else { a[d] };
                assert_eq!(b[d], expected, "edge {edge}");
            }
        }
    }

    #[test]
    fn edge_cell_corners_stay_perpendicular_to_axis() {
        for (axis, corners) in EDGE_CELL_CORNERS.iter().enumerate() {
            for &c in corners {
                assert_eq!(CORNER_OFFSETS[c][axis], 0);
            }
        }
    }

    #[test]
    fn cell_faces_pair_neighbors_along_direction() {
        for &[c0, c1, dir] in &CELL_PROC_FACE_MASK {
            let a = CORNER_OFFSETS[c0];
            let b = CORNER_OFFSETS[c1];
            // X is stored in bit 2, so direction 0 flips the highest bit.
            assert_eq!(c0 ^ c1, 4 >> dir);
            assert_eq!(a[dir] + 1, b[dir]);
        }
    }

    #[test]
    fn proc_edges_run_along_direction() {
        for (dir, edges) in PROC_EDGE_MASK.iter().enumerate() {
            for &e in edges {
                assert_eq!(e / 4, dir);
            }
        }
    }
}
