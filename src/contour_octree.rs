use crate::{
    mesh::{MeshData, MeshVertexId, MAX_VERTEX_COUNT},
    tables::*,
    voxel_octree::{CellId, VoxelBlock},
};

impl VoxelBlock {
    /// Extracts the surface of this block with dual contouring.
    ///
    /// Returns `None` if the block holds no voxels or more than
    /// [`MAX_VERTEX_COUNT`] of them.
    pub fn dual_contour(&mut self) -> Option<MeshData> {
        // Each voxel contains one vertex.
        let vertex_count = self.voxel_count;
        if vertex_count == 0 {
            return None;
        }
        if vertex_count > MAX_VERTEX_COUNT {
            log::warn!(
                "could not create geometry for block at {} (vertex count of {} exceeds limit of {})",
                self.root().extent.minimum,
                vertex_count,
                MAX_VERTEX_COUNT
            );
            return None;
        }

        let mut mesh = MeshData::with_vertex_count(vertex_count);

        let assigned = assign_vertices(self, self.root_id, &mut mesh, 0);
        debug_assert_eq!(assigned as usize, vertex_count);

        contour_cell(self, self.root_id, &mut mesh.indices);

        Some(mesh)
    }
}

/// Gives every voxel the next vertex id in depth-first order and writes its
/// position and normal.
fn assign_vertices(
    octree: &mut VoxelBlock,
    cell_id: CellId,
    mesh: &mut MeshData,
    mut next_id: MeshVertexId,
) -> MeshVertexId {
    let cell = &mut octree.all_cells[cell_id as usize];

    if let Some(children) = cell.children {
        for child in children {
            next_id = assign_vertices(octree, child, mesh, next_id);
        }
    } else if let Some(voxel) = &mut cell.voxel {
        voxel.mesh_vertex_id = next_id;

        let i = 3 * next_id as usize;
        mesh.positions[i..i + 3].copy_from_slice(&voxel.position.to_array());
        mesh.normals[i..i + 3].copy_from_slice(&voxel.normal.to_array());

        next_id += 1;
    }

    next_id
}

// 8 cells, 12 faces, 6 edges
fn contour_cell(octree: &VoxelBlock, cell_id: CellId, indices: &mut Vec<u16>) {
    let Some(children) = octree.cell(cell_id).children else {
        return;
    };

    for child in children {
        contour_cell(octree, child, indices);
    }

    // What remains of the interior of the parent cell can be found entirely
    // in the face interiors and edge interiors of the children.
    for [c0, c1, dir] in CELL_PROC_FACE_MASK {
        contour_face(octree, [children[c0], children[c1]], dir, indices);
    }

    for [c0, c1, c2, c3, dir] in CELL_PROC_EDGE_MASK {
        let cells = [c0, c1, c2, c3].map(|c| children[c]);
        contour_edge(octree, cells, dir, indices);
    }
}

/// Child `octant` of `cell_id`, or the cell itself if it is a leaf.
#[inline]
fn child_or_self(octree: &VoxelBlock, cell_id: CellId, octant: usize) -> CellId {
    match octree.cell(cell_id).children {
        Some(children) => children[octant],
        None => cell_id,
    }
}

// 4 faces and 4 edges
fn contour_face(octree: &VoxelBlock, cells: [CellId; 2], dir: usize, indices: &mut Vec<u16>) {
    // PRECONDITION: `cells` are given in increasing order (- side of face to + side).

    if cells.iter().all(|&c| octree.cell(c).is_leaf()) {
        // No edges on the face interior.
        return;
    }

    for [c0, c1, face_dir] in FACE_PROC_FACE_MASK[dir] {
        let face_cells = [
            child_or_self(octree, cells[0], c0),
            child_or_self(octree, cells[1], c1),
        ];
        contour_face(octree, face_cells, face_dir, indices);
    }

    for [order, c0, c1, c2, c3, edge_dir] in FACE_PROC_EDGE_MASK[dir] {
        // "Face direction" is not the same as "edge direction," and the two
        // face sides contribute to the edge in a direction-dependent order.
        let order = FACE_PROC_EDGE_ORDERS[order];
        let octants = [c0, c1, c2, c3];
        let edge_cells = [0, 1, 2, 3].map(|i| child_or_self(octree, cells[order[i]], octants[i]));
        contour_edge(octree, edge_cells, edge_dir, indices);
    }
}

// 2 edges
fn contour_edge(octree: &VoxelBlock, cells: [CellId; 4], dir: usize, indices: &mut Vec<u16>) {
    if cells.iter().all(|&c| octree.cell(c).is_leaf()) {
        process_leaf_edge(octree, cells, dir, indices);
        return;
    }

    // We must continue bisecting this edge.
    for [c0, c1, c2, c3, edge_dir] in EDGE_PROC_EDGE_MASK[dir] {
        let octants = [c0, c1, c2, c3];
        let edge_cells = [0, 1, 2, 3].map(|i| child_or_self(octree, cells[i], octants[i]));
        contour_edge(octree, edge_cells, edge_dir, indices);
    }
}

fn process_leaf_edge(
    octree: &VoxelBlock,
    cells: [CellId; 4],
    dir: usize,
    indices: &mut Vec<u16>,
) {
    let voxels = cells.map(|c| octree.cell(c).voxel.as_ref());
    // Leaves without a voxel are never adjacent to a crossing edge.
    let [Some(v0), Some(v1), Some(v2), Some(v3)] = voxels else {
        return;
    };
    let voxels = [v0, v1, v2, v3];

    // Check if this leaf edge is bipolar. We can just check the signs on the
    // smallest cell.
    let mut min_cell = 0;
    let mut max_depth = 0;
    for (i, &c) in cells.iter().enumerate() {
        let depth = octree.cell(c).depth;
        if i == 0 || depth > max_depth {
            max_depth = depth;
            min_cell = i;
        }
    }

    let [c0, c1] = EDGES[PROC_EDGE_MASK[dir][min_cell]];
    let voxel = voxels[min_cell];
    let m0 = voxel.is_solid(c0);
    let m1 = voxel.is_solid(c1);
    if m0 == m1 {
        // Not a bipolar edge.
        return;
    }
    // Flip when the first end point is solid.
    let flip = m0;

    let ids = voxels.map(|v| v.mesh_vertex_id as u16);
    let tris = if flip {
        [[0, 3, 1], [0, 2, 3]]
    } else {
        [[0, 1, 3], [0, 3, 2]]
    };
    for tri in tris {
        indices.extend(tri.map(|i| ids[i]));
    }
}
